use serde::Serialize;

/// One destination of the two-way navigation selector.
#[derive(Serialize, utoipa::ToSchema)]
pub struct NavigationEntry {
    #[schema(example = "app")]
    pub key: &'static str,
    #[schema(example = "📱 Main App")]
    pub label: &'static str,
    #[schema(example = "/api/v1/app")]
    pub base_path: &'static str,
    /// Whether the flow is behind the admin password.
    pub requires_password: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct NavigationResponse {
    pub flows: Vec<NavigationEntry>,
}

impl NavigationResponse {
    pub fn flows() -> Self {
        Self {
            flows: vec![
                NavigationEntry {
                    key: "app",
                    label: "📱 Main App",
                    base_path: "/api/v1/app",
                    requires_password: false,
                },
                NavigationEntry {
                    key: "admin",
                    label: "🚀 Enterprise Dashboard",
                    base_path: "/api/v1/admin",
                    requires_password: true,
                },
            ],
        }
    }
}
