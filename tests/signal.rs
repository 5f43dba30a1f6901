//! SIGTERM stops a running daemon and tears its socket down.
//!
//! Kept in its own test binary: the signal goes to the whole process.

use diskwatch::{run_daemon, shutdown_signal, Config, Reporter, Result, SectorRange};
use std::os::unix::net::UnixDatagram;
use std::process::Command;
use std::sync::mpsc;
use std::time::Duration;

struct ChannelReporter(mpsc::Sender<SectorRange>);

impl Reporter for ChannelReporter {
    fn report(&mut self, range: &SectorRange) -> Result<()> {
        let _ = self.0.send(*range);
        Ok(())
    }
}

#[tokio::test]
async fn test_sigterm_tears_down_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diskwatch");
    let config = Config {
        socket_path: path.clone(),
        ..Config::default()
    };

    let (tx, rx) = mpsc::channel();
    let daemon = tokio::spawn(async move {
        let mut reporter = ChannelReporter(tx);
        run_daemon(&config, &mut reporter, shutdown_signal()).await
    });

    // A reported range proves the loop has polled the shutdown future, so
    // the signal handlers are installed before SIGTERM is sent.
    let send_path = path.clone();
    let reported = tokio::task::spawn_blocking(move || {
        let client = UnixDatagram::unbound().unwrap();
        let payload = SectorRange::new(512, 8).to_payload();
        for _ in 0..500 {
            if client.send_to(&payload, &send_path).is_ok() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        rx.recv_timeout(Duration::from_secs(5)).unwrap()
    })
    .await
    .unwrap();
    assert_eq!(reported, SectorRange::new(512, 8));

    let status = Command::new("kill")
        .args(["-TERM", &std::process::id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let stats = tokio::time::timeout(Duration::from_secs(5), daemon)
        .await
        .expect("daemon did not stop on SIGTERM")
        .unwrap()
        .unwrap();
    assert_eq!(stats.received, 1);
    assert_eq!(stats.decoded, 1);
    assert!(!path.exists());
}
