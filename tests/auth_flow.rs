#![allow(clippy::unwrap_used)]

use passgate::{
    auth::ValidationError, Access, AccessGuard, AuthConfig, Authenticator, CredentialStore, Error,
    HasherConfig, IdentityKey, MemoryCredentialStore, SessionManager,
};
use secrecy::SecretString;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

fn config() -> AuthConfig {
    AuthConfig::new().with_hasher(HasherConfig::new().with_cost(1).with_memory_kib(4096))
}

struct App {
    auth: Authenticator,
    store: Arc<MemoryCredentialStore>,
    sessions: Arc<SessionManager>,
    guard: AccessGuard,
}

fn app(config: AuthConfig) -> App {
    let store = Arc::new(MemoryCredentialStore::new());
    let sessions = Arc::new(SessionManager::in_memory(&config).unwrap());
    App {
        auth: Authenticator::new(config, store.clone()).unwrap(),
        store,
        guard: AccessGuard::new(sessions.clone()),
        sessions,
    }
}

#[test]
fn signup_login_logout_walkthrough() {
    let app = app(config());

    let credential = app
        .auth
        .register("shmee@me.com", &secret("jumanji"), &secret("jumanji"))
        .unwrap();
    assert_eq!(credential.identity.as_str(), "shmee@me.com");
    assert!(!credential.digest.as_str().contains("jumanji"));
    assert_eq!(app.store.len(), 1);

    let identity = app.auth.verify("shmee@me.com", &secret("jumanji")).unwrap();
    assert_eq!(identity.as_str(), "shmee@me.com");
    assert!(matches!(
        app.auth.verify("shmee@me.com", &secret("ijnamuj")),
        Err(Error::AuthFailure)
    ));

    let token = app.sessions.issue(&identity).unwrap();
    assert_eq!(app.guard.resolve(Some(&token)), Access::Identified(identity));

    app.sessions.revoke(&token);
    assert_eq!(app.guard.resolve(Some(&token)), Access::Anonymous);
}

#[test]
fn signup_with_mismatched_confirmation_stores_nothing() {
    let app = app(config());
    let result = app
        .auth
        .register("shmee@me.com", &secret("jumanji"), &secret("jumanji!"));
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::PasswordMismatch))
    ));
    assert!(app.store.is_empty());
}

#[test]
fn duplicate_signup_leaves_original_credential() {
    let app = app(config());
    let original = app
        .auth
        .register("shmee@me.com", &secret("jumanji"), &secret("jumanji"))
        .unwrap();

    assert!(matches!(
        app.auth
            .register("Shmee@Me.Com", &secret("zathura"), &secret("zathura")),
        Err(Error::Conflict)
    ));

    let stored = app
        .store
        .find_by_identity(&original.identity)
        .unwrap()
        .unwrap();
    assert_eq!(stored, original);
    assert!(app.auth.verify("shmee@me.com", &secret("jumanji")).is_ok());
}

#[test]
fn hash_properties_hold_for_many_plaintexts() {
    let app = app(config());
    let hasher = app.auth.hasher();
    let plaintexts = ["jumanji", "ijnamuj", "p@ss w0rd", "ñandú", "x"];

    for (i, plaintext) in plaintexts.iter().enumerate() {
        let first = hasher.hash(plaintext.as_bytes()).unwrap();
        let second = hasher.hash(plaintext.as_bytes()).unwrap();
        assert_ne!(first, second);
        assert!(hasher.verify(plaintext.as_bytes(), &first));
        assert!(hasher.verify(plaintext.as_bytes(), &second));

        for (j, other) in plaintexts.iter().enumerate() {
            if i != j {
                assert!(!hasher.verify(other.as_bytes(), &first));
            }
        }
    }
}

#[test]
fn unknown_identity_and_wrong_password_look_alike() {
    let app = app(config());
    app.auth
        .register("shmee@me.com", &secret("jumanji"), &secret("jumanji"))
        .unwrap();

    // Warm up allocator and caches.
    let _ = app.auth.verify("shmee@me.com", &secret("warmup!"));
    let _ = app.auth.verify("nobody@me.com", &secret("warmup!"));

    let rounds = 8;
    let mut wrong_password = Duration::ZERO;
    let mut unknown_identity = Duration::ZERO;
    for _ in 0..rounds {
        let started = Instant::now();
        let wrong = app.auth.verify("shmee@me.com", &secret("ijnamuj"));
        wrong_password += started.elapsed();

        let started = Instant::now();
        let unknown = app.auth.verify("nobody@me.com", &secret("ijnamuj"));
        unknown_identity += started.elapsed();

        assert!(matches!(wrong, Err(Error::AuthFailure)));
        assert!(matches!(unknown, Err(Error::AuthFailure)));
    }

    assert!(
        unknown_identity * 3 >= wrong_password && wrong_password * 3 >= unknown_identity,
        "wrong password took {wrong_password:?}, unknown identity took {unknown_identity:?}"
    );
}

#[test]
fn session_with_one_second_ttl_expires() {
    let app = app(config().with_session_ttl_seconds(1));
    let identity = IdentityKey::parse("shmee@me.com").unwrap();
    let token = app.sessions.issue(&identity).unwrap();
    assert_eq!(app.sessions.validate(&token).unwrap(), identity);

    std::thread::sleep(Duration::from_secs(2));

    assert!(matches!(app.sessions.validate(&token), Err(Error::Invalid)));
    assert!(app.guard.resolve(Some(&token)).is_anonymous());
}

#[test]
fn delete_account_and_logout_everywhere() {
    let app = app(config());
    app.auth
        .register("shmee@me.com", &secret("jumanji"), &secret("jumanji"))
        .unwrap();
    let identity = app.auth.verify("shmee@me.com", &secret("jumanji")).unwrap();
    let laptop = app.sessions.issue(&identity).unwrap();
    let phone = app.sessions.issue(&identity).unwrap();

    let deleted = app
        .auth
        .delete_account("shmee@me.com", &secret("jumanji"))
        .unwrap();
    assert_eq!(app.sessions.revoke_all(&deleted).unwrap(), 2);

    assert!(app.guard.require(Some(&laptop)).is_err());
    assert!(app.guard.require(Some(&phone)).is_err());
    assert!(app.store.is_empty());
}
