use super::*;

/// # Safety
/// Tests touching these vars must not run concurrently with each other.
unsafe fn clear_admin_env() {
    unsafe {
        std::env::remove_var("ADMIN_API_URL");
        std::env::remove_var("ADMIN_TOKEN_PATH");
        std::env::remove_var("ADMIN_REQUIRE_TOKEN_EXP");
    }
}

static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[test]
fn from_env_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_admin_env() };

    let cfg = AdminConfig::from_env().unwrap();
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.expiry_policy, ExpiryPolicy::AllowMissing);
    assert!(cfg.token_path.ends_with(TOKEN_SLOT_NAME));
}

#[test]
fn from_env_reads_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_admin_env();
        std::env::set_var("ADMIN_API_URL", "https://api.example.test/");
        std::env::set_var("ADMIN_TOKEN_PATH", "/tmp/academy-admin-test/token");
        std::env::set_var("ADMIN_REQUIRE_TOKEN_EXP", "yes");
    }

    let cfg = AdminConfig::from_env().unwrap();
    assert_eq!(cfg.api_base_url, "https://api.example.test");
    assert_eq!(cfg.token_path, PathBuf::from("/tmp/academy-admin-test/token"));
    assert_eq!(cfg.expiry_policy, ExpiryPolicy::RequireExp);

    unsafe { clear_admin_env() };
}

#[test]
fn from_env_rejects_bad_bool() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_admin_env();
        std::env::set_var("ADMIN_REQUIRE_TOKEN_EXP", "maybe");
    }

    let err = AdminConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBool { var: "ADMIN_REQUIRE_TOKEN_EXP", .. }));

    unsafe { clear_admin_env() };
}

#[test]
fn from_env_rejects_base_url_without_scheme() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_admin_env();
        std::env::set_var("ADMIN_API_URL", "localhost:5000");
    }

    let err = AdminConfig::from_env().unwrap_err();
    assert!(
        matches!(&err, ConfigError::InvalidBaseUrl { value, .. } if value == "localhost:5000"),
        "{err:?}"
    );

    unsafe { clear_admin_env() };
}

#[test]
fn from_env_rejects_unparseable_base_url() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_admin_env();
        std::env::set_var("ADMIN_API_URL", "not a url");
    }

    let err = AdminConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }), "{err:?}");

    unsafe { clear_admin_env() };
}

#[test]
fn set_base_url_normalizes_and_validates() {
    let mut cfg = AdminConfig {
        api_base_url: DEFAULT_API_BASE_URL.to_owned(),
        token_path: PathBuf::from("token"),
        expiry_policy: ExpiryPolicy::AllowMissing,
    };

    cfg.set_base_url("https://api.example.test/ ").unwrap();
    assert_eq!(cfg.api_base_url, "https://api.example.test");

    let err = cfg.set_base_url("ftp://files.example.test").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }), "{err:?}");
    assert_eq!(cfg.api_base_url, "https://api.example.test");
}

#[test]
fn normalize_base_url_trims_slashes_and_whitespace() {
    assert_eq!(normalize_base_url(" http://h:1// "), "http://h:1");
    assert_eq!(normalize_base_url(""), DEFAULT_API_BASE_URL);
}
