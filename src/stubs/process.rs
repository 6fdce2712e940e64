use std::time::Duration;

/// Waits up to two seconds for `pid` to exit. A zombie counts as gone.
pub async fn wait_until_gone(pid: &str) -> bool {
    let proc_stat = format!("/proc/{}/stat", pid.trim());
    for _ in 0..100 {
        match std::fs::read_to_string(&proc_stat) {
            Err(_) => return true,
            Ok(stat) if stat.contains(") Z ") => return true,
            Ok(_) => tokio::time::sleep(Duration::from_millis(20)).await,
        }
    }
    false
}
