//! Builder for constructing routers.

use crate::builder::error::{BuildError, PatternReport};
use crate::config::RouterConfig;
use crate::core::Guard;
use crate::engine::Router;
use crate::host::Host;
use crate::routing::{RouteOptions, RouteTable};
use stillwater::validation::Validation;

/// Builder for constructing routers with a fluent API.
pub struct RouterBuilder<P> {
    config: RouterConfig,
    routes: Vec<(String, P, RouteOptions)>,
    fallback: Option<P>,
}

impl<P> RouterBuilder<P>
where
    P: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            config: RouterConfig::default(),
            routes: Vec::new(),
            fallback: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Reject patterns with structural issues when building.
    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict_patterns = strict;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = Some(limit);
        self
    }

    /// Add a route. Routes are matched in the order they are added.
    pub fn route(self, pattern: &str, payload: P) -> Self {
        self.route_with(pattern, payload, RouteOptions::default())
    }

    pub fn route_with(mut self, pattern: &str, payload: P, options: RouteOptions) -> Self {
        self.routes.push((pattern.to_string(), payload, options));
        self
    }

    pub fn guarded_route(self, pattern: &str, payload: P, guard: Guard) -> Self {
        self.route_with(pattern, payload, RouteOptions::new().guard(guard))
    }

    pub fn fallback(mut self, payload: P) -> Self {
        self.fallback = Some(payload);
        self
    }

    /// Build the router on top of `host`.
    ///
    /// In strict mode every pattern is validated and all failing patterns
    /// are reported together.
    pub fn build<H: Host>(self, host: H) -> Result<Router<P, H>, BuildError> {
        self.config.validate()?;

        let mut table = RouteTable::new();
        let mut reports = Vec::new();
        for (pattern, payload, options) in self.routes {
            table.add_route_with(&pattern, payload, options);
            if !self.config.strict_patterns {
                continue;
            }
            let compiled = &table.entries()[table.len() - 1].pattern;
            if let Validation::Failure(issues) = compiled.validate() {
                reports.push(PatternReport {
                    pattern,
                    issues: issues.iter().cloned().collect(),
                });
            }
        }

        if !reports.is_empty() {
            tracing::warn!(invalid = reports.len(), "router build rejected");
            return Err(BuildError::InvalidPatterns(reports));
        }

        if let Some(fallback) = self.fallback {
            table.set_fallback(fallback);
        }
        tracing::debug!(routes = table.len(), "router built");
        Ok(Router::from_parts(host, self.config, table))
    }
}

impl<P> Default for RouterBuilder<P>
where
    P: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PatternIssue;
    use crate::host::HeadlessHost;

    #[test]
    fn builds_routes_in_order() {
        let router = RouterBuilder::new()
            .route("/", "home")
            .route("/blog/:id", "blog")
            .fallback("missing")
            .build(HeadlessHost)
            .unwrap();

        assert_eq!(router.route_count(), 2);
        assert_eq!(router.fallback(), Some("missing"));
        assert_eq!(router.lookup("/blog/1").unwrap().payload, "blog");
    }

    #[test]
    fn lenient_mode_accepts_odd_patterns() {
        let router = RouterBuilder::new()
            .route("/*/x", "odd")
            .build(HeadlessHost);

        assert!(router.is_ok());
    }

    #[test]
    fn strict_mode_reports_every_bad_pattern() {
        let result = RouterBuilder::new()
            .strict(true)
            .route("/ok/:id", "ok")
            .route("/*/x", "wild")
            .route("/a/:id/:id", "dup")
            .build(HeadlessHost);

        match result {
            Err(BuildError::InvalidPatterns(reports)) => {
                assert_eq!(reports.len(), 2);
                assert_eq!(reports[0].pattern, "/*/x");
                assert_eq!(reports[1].pattern, "/a/:id/:id");
                assert!(reports[1].issues.contains(&PatternIssue::DuplicateParameter {
                    name: "id".to_string()
                }));
            }
            other => panic!("Expected pattern errors, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn zero_history_limit_is_rejected() {
        let result = RouterBuilder::<&str>::new().history_limit(0).build(HeadlessHost);

        assert!(matches!(result, Err(BuildError::Config(_))));
    }

    #[test]
    fn guarded_route_keeps_guard() {
        let router = RouterBuilder::new()
            .guarded_route("/secret", "secret", Guard::deny())
            .build(HeadlessHost)
            .unwrap();

        assert_eq!(router.route_count(), 1);
        assert_eq!(router.config(), &RouterConfig::default());
    }
}
