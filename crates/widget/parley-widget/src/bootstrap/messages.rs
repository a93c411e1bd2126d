//! User-facing text shown while the widget bootstraps

/// Shown on entering organization resolution
pub const LOADING_ORGANIZATION: &str = "Loading organization...";
/// Shown while the organization validator runs
pub const FINDING_ORGANIZATION: &str = "Finding organization...";
/// Shown on entering session resolution
pub const FINDING_CONTACT_SESSION: &str = "Finding contact session...";
/// Shown while the session validator runs
pub const VERIFYING_CONTACT_SESSION: &str = "Verifying contact session...";

/// Error when the widget was embedded without an organization id
pub const ORGANIZATION_ID_REQUIRED: &str = "Organization ID is required";
/// Error when the organization is invalid and the validator gave no reason
pub const INVALID_CONFIGURATION: &str = "Invalid configuration.";
/// Error when the organization validator could not be reached
pub const UNABLE_TO_VERIFY_ORGANIZATION: &str = "Unable to verify organization.";

/// Placeholder for a loading screen with no message yet
pub const DEFAULT_LOADING: &str = "Loading...";
