use std::fmt;

/// The ordered steps of a provisioning run.
///
/// Failures carry the step they occurred at so that operators can tell which
/// resources exist. There is deliberately no rollback: a failed run leaves
/// everything created so far in place, and decommissioning cleans up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    EnsureNamespace,
    CreateDatabaseWorkload,
    CreateDatabaseService,
    CreateAdminWorkload,
    CreateAdminService,
    CreateMiddleware,
    CreateRoute,
}

impl ProvisionStep {
    pub fn as_str(self) -> &'static str {
        match self {
            ProvisionStep::EnsureNamespace => "ensure-namespace",
            ProvisionStep::CreateDatabaseWorkload => "create-database-workload",
            ProvisionStep::CreateDatabaseService => "create-database-service",
            ProvisionStep::CreateAdminWorkload => "create-admin-workload",
            ProvisionStep::CreateAdminService => "create-admin-service",
            ProvisionStep::CreateMiddleware => "create-middleware",
            ProvisionStep::CreateRoute => "create-route",
        }
    }
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
