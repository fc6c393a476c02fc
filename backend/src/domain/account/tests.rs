//! Tests for account value types.

use super::*;
use rstest::rstest;

#[rstest]
#[case("", AccountValidationError::EmptyId)]
#[case("not-a-uuid", AccountValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", AccountValidationError::InvalidId)]
fn account_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: AccountValidationError) {
    assert_eq!(AccountId::new(raw), Err(expected));
}

#[rstest]
fn account_id_serialises_as_string() {
    let id = AccountId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    let value = serde_json::to_value(id).expect("serialise id");
    assert_eq!(value, serde_json::json!("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
}

#[rstest]
#[case("", AccountValidationError::EmptyEmail)]
#[case("   ", AccountValidationError::EmptyEmail)]
#[case("ada", AccountValidationError::InvalidEmail)]
#[case("ada@example", AccountValidationError::InvalidEmail)]
#[case("a da@example.com", AccountValidationError::InvalidEmail)]
fn email_rejects_invalid_input(#[case] raw: &str, #[case] expected: AccountValidationError) {
    assert_eq!(Email::new(raw), Err(expected));
}

#[rstest]
fn email_is_normalised() {
    let email = Email::new(" Grace@Navy.MIL ").expect("valid email");
    assert_eq!(email.as_ref(), "grace@navy.mil");
}

#[rstest]
fn display_name_is_trimmed_and_bounded() {
    let name = DisplayName::new("  Ada Lovelace ").expect("valid name");
    assert_eq!(name.as_ref(), "Ada Lovelace");

    let too_long = "x".repeat(DISPLAY_NAME_MAX + 1);
    assert_eq!(
        DisplayName::new(too_long),
        Err(AccountValidationError::DisplayNameTooLong {
            max: DISPLAY_NAME_MAX
        })
    );
    assert_eq!(
        DisplayName::new("   "),
        Err(AccountValidationError::EmptyDisplayName)
    );
}

#[rstest]
fn credential_hash_debug_is_redacted() {
    let hash = CredentialHash::new("$argon2id$v=19$secret");
    assert_eq!(format!("{hash:?}"), "CredentialHash(..)");
}

#[rstest]
#[case(AccountStatus::Active)]
#[case(AccountStatus::Deleting)]
fn status_storage_representation_parses_back(#[case] status: AccountStatus) {
    assert_eq!(AccountStatus::parse(status.as_str()), Some(status));
}

#[rstest]
fn registered_account_starts_active_and_unrelated() {
    let account = Account::register(
        Email::new("ada@example.com").expect("email"),
        DisplayName::new("Ada").expect("name"),
        CredentialHash::new("hash"),
    );
    assert!(account.is_active());
    assert!(account.followers.is_empty());
    assert!(account.following.is_empty());
}

#[rstest]
fn relation_accessors_address_the_right_set() {
    let mut account = Account::register(
        Email::new("ada@example.com").expect("email"),
        DisplayName::new("Ada").expect("name"),
        CredentialHash::new("hash"),
    );
    let other = AccountId::random();

    account.relation_mut(RelationSide::Followers).insert(other);
    assert!(account.is_followed_by(&other));
    assert!(!account.follows(&other));
    assert!(account.relation(RelationSide::Following).is_empty());
}
