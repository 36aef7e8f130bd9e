use super::*;
use crate::loader::ConfigLoader;

fn load(content: &str) -> Config {
    ConfigLoader::load_str(content).unwrap()
}

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_invalid_port() {
    let mut config = Config::default();
    config.server.port = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "server.port"));
}

#[test]
fn test_validate_public_url_scheme() {
    let mut config = Config::default();
    config.server.public_url = Some("ci.example.com".to_string());

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "server.public_url"));
}

#[test]
fn test_validate_prefix() {
    let mut config = Config::default();
    config.gateway.prefix = "buildByToken".to_string();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "gateway.prefix"));

    config.gateway.prefix = "/buildByToken/".to_string();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "gateway.prefix"));
}

#[test]
fn test_validate_prefix_rejects_route_syntax() {
    for prefix in ["/build/{job}", "/trigger*", "/{prefix}", "/a/:id", "/a//b"] {
        let mut config = Config::default();
        config.gateway.prefix = prefix.to_string();
        let result = ConfigValidator::validate(&config).unwrap();
        assert!(
            result.errors.iter().any(|e| e.path == "gateway.prefix"),
            "{} accepted",
            prefix
        );
    }
}

#[test]
fn test_validate_prefix_rejects_host_routes() {
    for prefix in ["/queue", "/queue/item", "/livez", "/crumbIssuer"] {
        let mut config = Config::default();
        config.gateway.prefix = prefix.to_string();
        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.path == "gateway.prefix"), "{}", prefix);
    }

    let mut config = Config::default();
    config.gateway.prefix = "/queued-builds".to_string();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.is_empty());
}

#[test]
fn test_validate_zero_retained_builds() {
    let mut config = Config::default();
    config.queue.retained_builds = 0;
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "queue.retained_builds"));
}

#[test]
fn test_validate_zero_executors() {
    let mut config = Config::default();
    config.queue.max_executors = 0;
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "queue.max_executors"));
}

#[test]
fn test_duplicate_job_path() {
    let config = load(
        r#"
        [[jobs]]
        path = "dir/p"
        token = "0123456789abcdef"

        [[jobs]]
        path = "dir/p"
        token = "0123456789abcdef"
        "#,
    );
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "jobs[1].path"));
}

#[test]
fn test_empty_path_segment() {
    let config = load("[[jobs]]\npath = \"dir//p\"\ntoken = \"0123456789abcdef\"");
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "jobs[0].path"));
}

#[test]
fn test_token_warnings() {
    let config = load(
        r#"
        [[jobs]]
        path = "untriggerable"

        [[jobs]]
        path = "short"
        token = "abc"

        [[jobs]]
        path = "fine"
        token = "0123456789abcdef"
        "#,
    );
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 2);
    assert!(result.warnings.iter().any(|w| w.path == "jobs[0].token"));
    assert!(result.warnings.iter().any(|w| w.path == "jobs[1].token"));
}

#[test]
fn test_choice_parameter_rules() {
    let config = load(
        r#"
        [[jobs]]
        path = "p"
        token = "0123456789abcdef"

        [[jobs.parameters]]
        name = "empty"
        kind = "choice"

        [[jobs.parameters]]
        name = "target"
        kind = "choice"
        choices = ["staging", "production"]
        default = "qa"
        "#,
    );
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "jobs[0].parameters[0].choices"));
    assert!(result.errors.iter().any(|e| e.path == "jobs[0].parameters[1].default"));
}

#[test]
fn test_duplicate_parameter_name() {
    let config = load(
        r#"
        [[jobs]]
        path = "p"
        token = "0123456789abcdef"

        [[jobs.parameters]]
        name = "foo"

        [[jobs.parameters]]
        name = "foo"
        "#,
    );
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "jobs[0].parameters[1].name"));
}
