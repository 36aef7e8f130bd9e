use super::*;
use crate::job::ConfiguredJob;
use triggergate_protocols::{Identity, as_system, with_identity};

fn job(path: &str) -> Arc<dyn Job> {
    Arc::new(ConfiguredJob::builder(path).token("secret").build())
}

#[test]
fn test_registry_new_is_empty() {
    let registry = JobRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
}

#[test]
fn test_register_creates_folders() {
    let registry = JobRegistry::new();
    registry.register(job("dir/sub/prj")).unwrap();

    assert!(registry.is_folder("dir"));
    assert!(registry.is_folder("dir/sub"));
    assert!(!registry.is_folder("dir/sub/prj"));
    assert_eq!(registry.job_names(), vec!["dir/sub/prj"]);
}

#[test]
fn test_register_duplicate() {
    let registry = JobRegistry::new();
    registry.register(job("p")).unwrap();
    assert_eq!(
        registry.register(job("p")),
        Err(RegistryError::AlreadyRegistered("p".to_string()))
    );
}

#[test]
fn test_register_job_over_folder() {
    let registry = JobRegistry::new();
    registry.register(job("dir/prj")).unwrap();
    assert!(matches!(
        registry.register(job("dir")),
        Err(RegistryError::AlreadyRegistered(_))
    ));
}

#[test]
fn test_register_under_job_fails() {
    let registry = JobRegistry::new();
    registry.register(job("p")).unwrap();
    assert!(matches!(
        registry.register(job("p/child")),
        Err(RegistryError::ParentNotFolder { .. })
    ));
}

#[test]
fn test_register_invalid_paths() {
    let registry = JobRegistry::new();
    assert!(matches!(registry.register(job("")), Err(RegistryError::InvalidPath(_))));
    assert!(matches!(
        registry.register(job("dir//prj")),
        Err(RegistryError::InvalidPath(_))
    ));
}

#[test]
fn test_lookup_hidden_from_anonymous() {
    let registry = JobRegistry::new();
    registry.register(job("p")).unwrap();

    assert!(registry.item_by_full_name("p").is_none());
    assert!(as_system(|| registry.item_by_full_name("p")).is_some());
}

#[test]
fn test_lookup_visible_to_anonymous_when_readable() {
    let registry = JobRegistry::new();
    registry
        .register(Arc::new(ConfiguredJob::builder("pub").anonymous_read(true).build()))
        .unwrap();
    assert!(registry.item_by_full_name("pub").is_some());
}

#[tokio::test]
async fn test_lookup_as_user() {
    let registry = JobRegistry::new();
    registry.register(job("dir/prj")).unwrap();

    let found = with_identity(Identity::User("alice".to_string()), async {
        registry.item_by_full_name("dir/prj")
    })
    .await;
    assert_eq!(found.unwrap().full_name(), "dir/prj");
}

#[test]
fn test_lookup_folder_is_not_a_job() {
    let registry = JobRegistry::new();
    registry.register(job("dir/prj")).unwrap();
    assert!(as_system(|| registry.item_by_full_name("dir")).is_none());
}

#[test]
fn test_lookup_tolerates_surrounding_slashes() {
    let registry = JobRegistry::new();
    registry.register(job("dir/prj")).unwrap();
    assert!(as_system(|| registry.item_by_full_name("/dir/prj/")).is_some());
}

#[test]
fn test_concurrent_registration_of_same_path() {
    let registry = JobRegistry::new();
    let accepted = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| registry.register(job("dir/p")).is_ok()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|ok| *ok)
            .count()
    });
    assert_eq!(accepted, 1);
    assert_eq!(registry.len(), 1);
}
