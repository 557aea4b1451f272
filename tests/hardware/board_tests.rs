//! Tests requiring a Girino board.
//!
//! # Running Hardware Tests
//!
//! ```bash
//! export GIRINO_TEST_PORT=/dev/ttyACM0   # or COM3 on Windows
//! export GIRINO_TEST_BAUD=115200         # optional
//! cargo test --features hardware-tests -- --ignored
//! ```

use super::utils::{skip_without_hardware, wait_for_board_reset};
use girino_serial::channel::{CancelToken, SerialChannel};
use girino_serial::discovery;
use girino_serial::port::PortError;
use std::time::Duration;

#[test]
#[ignore] // Run with --ignored flag
fn test_board_is_discovered() {
    let Some(config) = skip_without_hardware() else {
        return;
    };

    let ports = discovery::enumerate();
    println!("Discovered: {:?}", ports);
    assert!(
        ports.iter().any(|p| p.name == config.port_name),
        "{} not among discovered ports",
        config.port_name
    );
}

#[tokio::test]
#[ignore]
async fn test_open_close_reopen() {
    let Some(config) = skip_without_hardware() else {
        return;
    };

    let mut channel = SerialChannel::open_with(&config.port_name, &config.parameters())
        .await
        .expect("open board");
    assert!(channel.is_open());
    channel.close();
    channel.close();

    let channel = SerialChannel::open_with(&config.port_name, &config.parameters())
        .await
        .expect("reopen board");
    assert!(channel.is_open());
}

#[tokio::test]
#[ignore]
async fn test_second_open_times_out() {
    let Some(config) = skip_without_hardware() else {
        return;
    };

    let _held = SerialChannel::open_with(&config.port_name, &config.parameters())
        .await
        .expect("open board");

    let second = SerialChannel::open_with(&config.port_name, &config.parameters()).await;
    assert!(matches!(second, Err(PortError::BusyOrTimeout { .. })));
}

#[tokio::test]
#[ignore]
async fn test_board_answers_status_query() {
    let Some(config) = skip_without_hardware() else {
        return;
    };

    let mut channel = SerialChannel::open_with(&config.port_name, &config.parameters())
        .await
        .expect("open board");
    wait_for_board_reset().await;

    // Drain the start-up banner.
    let drain = CancelToken::new();
    let canceller = drain.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        canceller.cancel();
    });
    while channel.read_line(&drain).await.expect("drain").is_some() {}

    channel.write_line("d").expect("write status query");

    let cancel = CancelToken::new();
    let timeout = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        timeout.cancel();
    });

    let reply = channel.read_line(&cancel).await.expect("read reply");
    println!("Status reply: {:?}", reply);
    assert!(reply.is_some(), "board did not answer within 3s");
}

#[tokio::test]
#[ignore]
async fn test_cancel_idle_read() {
    let Some(config) = skip_without_hardware() else {
        return;
    };

    let mut channel = SerialChannel::open_with(&config.port_name, &config.parameters())
        .await
        .expect("open board");
    let cancel = CancelToken::new();
    cancel.cancel();

    assert_eq!(channel.read_line(&cancel).await.expect("read"), None);
    assert!(channel.is_open());
}
