//! Profile Data

use crate::domain::profiles::records::{Role, UserUuid};

/// New Profile Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    /// UUID to assign to the profile row.
    pub uuid: UserUuid,

    /// Name shown to other users.
    pub display_name: String,

    /// Marketplace role.
    pub role: Role,
}
