//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (`*Repository`, [`CredentialHasher`]) describe what the domain
//! needs from storage and security adapters; each exposes a typed error so
//! adapters map their failures predictably. Driving ports (commands and
//! queries) are what inbound adapters call; they speak the transport-agnostic
//! [`crate::domain::Error`].

mod macros;
pub(crate) use macros::define_port_error;

mod account_deletion_command;
mod account_registration;
mod account_repository;
mod accounts_query;
mod credential_hasher;
mod login_service;
mod post_command;
mod post_query;
mod post_repository;
mod profile_command;
mod profile_query;
mod profile_repository;
mod relationship_command;
mod relationship_query;

#[cfg(test)]
pub use account_deletion_command::MockAccountDeletionCommand;
pub use account_deletion_command::AccountDeletionCommand;
#[cfg(test)]
pub use account_registration::MockAccountRegistration;
pub use account_registration::AccountRegistration;
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
#[cfg(test)]
pub use accounts_query::MockAccountsQuery;
pub use accounts_query::AccountsQuery;
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use post_command::MockPostCommand;
pub use post_command::PostCommand;
#[cfg(test)]
pub use post_query::MockPostQuery;
pub use post_query::PostQuery;
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostRepository, PostRepositoryError};
#[cfg(test)]
pub use profile_command::MockProfileCommand;
pub use profile_command::ProfileCommand;
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::{ProfileQuery, ProfileView};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use relationship_command::MockRelationshipCommand;
pub use relationship_command::RelationshipCommand;
#[cfg(test)]
pub use relationship_query::MockRelationshipQuery;
pub use relationship_query::RelationshipQuery;
