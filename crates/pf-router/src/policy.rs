use pf_config::{ConnectionConfig, GlobalConfig, ProfileContent, RouteMatrix};

/// Immutable routing policy snapshot consumed by [`crate::synthesize`] and
/// [`crate::compile`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoutingPolicy {
    /// Route everything to `direct`, ignoring lists and `bypass_cn`.
    pub force_direct_connection: bool,
    pub bypass_cn: bool,
    pub bypass_lan: bool,
    pub bypass_bittorrent: bool,
    pub dns_interception: bool,
    /// Put the freedom outbound first so it becomes the default route.
    pub use_direct_outbound_as_primary: bool,
    pub matrix: RouteMatrix,
}

impl RoutingPolicy {
    pub fn new(connection: &ConnectionConfig, matrix: RouteMatrix) -> Self {
        Self {
            force_direct_connection: connection.force_direct_connection,
            bypass_cn: connection.bypass_cn,
            bypass_lan: connection.bypass_lan,
            bypass_bittorrent: connection.bypass_bittorrent,
            dns_interception: connection.dns_interception,
            use_direct_outbound_as_primary: connection.use_direct_outbound_as_primary,
            matrix,
        }
    }

    pub fn from_global(cfg: &GlobalConfig) -> Self {
        Self::new(&cfg.connection, cfg.route_matrix.clone())
    }

    /// Prefer a route matrix embedded in the profile's routing options over
    /// the global one.
    #[must_use]
    pub fn with_profile_matrix(mut self, profile: &ProfileContent) -> Self {
        if let Some(m) = RouteMatrix::from_extra_options(&profile.routing.extra_options) {
            tracing::debug!("using route matrix embedded in profile");
            self.matrix = m;
        }
        self
    }
}
