//! Macros for declaring route tables.

/// Start a [`RouterBuilder`](crate::builder::RouterBuilder) from a list of
/// `pattern => payload` pairs, optionally preceded by a fallback.
///
/// # Example
///
/// ```
/// use waypoint::host::HeadlessHost;
/// use waypoint::routes;
///
/// let router = routes! {
///     fallback: "not-found";
///     "/" => "home",
///     "/blog/:id" => "blog",
/// }
/// .build(HeadlessHost)
/// .unwrap();
///
/// assert_eq!(router.route_count(), 2);
/// assert_eq!(router.fallback(), Some("not-found"));
/// ```
#[macro_export]
macro_rules! routes {
    (
        fallback: $fallback:expr;
        $($pattern:literal => $payload:expr),* $(,)?
    ) => {
        $crate::builder::RouterBuilder::new()
            $(.route($pattern, $payload))*
            .fallback($fallback)
    };
    ($($pattern:literal => $payload:expr),* $(,)?) => {
        $crate::builder::RouterBuilder::new()
            $(.route($pattern, $payload))*
    };
}

#[cfg(test)]
mod tests {
    use crate::host::HeadlessHost;

    #[derive(Clone, Debug, PartialEq)]
    enum Page {
        Home,
        User,
        Missing,
    }

    #[test]
    fn routes_macro_registers_in_order() {
        let router = routes! {
            "/" => Page::Home,
            "/user/:id" => Page::User,
        }
        .build(HeadlessHost)
        .unwrap();

        assert_eq!(router.route_count(), 2);
        assert_eq!(router.lookup("/user/3").unwrap().payload, Page::User);
        assert_eq!(router.fallback(), None);
    }

    #[test]
    fn routes_macro_sets_fallback() {
        let router = routes! {
            fallback: Page::Missing;
            "/" => Page::Home
        }
        .build(HeadlessHost)
        .unwrap();

        assert_eq!(router.fallback(), Some(Page::Missing));
    }

    #[test]
    fn routes_macro_accepts_empty_list() {
        let router = routes! {}.strict(true).build::<HeadlessHost>(HeadlessHost);
        let router: crate::engine::Router<Page, HeadlessHost> = router.unwrap();

        assert_eq!(router.route_count(), 0);
    }
}
