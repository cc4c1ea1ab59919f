use super::*;

#[test]
fn test_command_exists() {
    #[cfg(unix)]
    assert!(WebDriverManager::command_exists("ls"));

    assert!(!WebDriverManager::command_exists("nonexistent_command_12345"));
}

#[test]
fn test_find_free_port() {
    let port = WebDriverManager::find_free_port().unwrap();
    assert!(port > 0);
}

#[tokio::test]
async fn test_is_driver_ready_when_nothing_listens() {
    let port = WebDriverManager::find_free_port().unwrap();
    let url = format!("http://127.0.0.1:{}", port);
    assert!(!WebDriverManager::is_driver_ready(&url).await);
}

#[test]
fn test_stop_all_empty() {
    let manager = WebDriverManager::new();
    // Should not panic even with no processes
    manager.stop_all();
    manager.stop_url("http://localhost:1");
}
