use std::fs;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use pnet::datalink::MacAddr;
use sonar_common::config::{DatabaseConfig, DiscoveryConfig};
use sonar_common::network::host::HostRecord;
use sonar_common::network::interface::{InterfaceError, LocalLink, find_by_name};
use sonar_core::prober::{ProbeError, Prober, TcpProber, UdpProber};
use sonar_core::scanner::{self, LocalScanner};
use sonar_core::sink::{DatabaseSink, FileSink, HostSink, file};
use tokio::net::TcpListener;

use crate::utils::{FakeMedium, LOCAL_MAC, arp_reply, ni, v4};

const PEER_MAC: MacAddr = MacAddr(0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff);

struct AlwaysAlive;

#[async_trait]
impl Prober for AlwaysAlive {
    async fn probe(&self, _addr: Ipv4Addr, _port: u16) -> Result<(), ProbeError> {
        Ok(())
    }
}

struct NeverAlive;

#[async_trait]
impl Prober for NeverAlive {
    async fn probe(&self, addr: Ipv4Addr, port: u16) -> Result<(), ProbeError> {
        Err(ProbeError::Timeout {
            addr: SocketAddr::from((addr, port)),
            after: Duration::from_secs(5),
        })
    }
}

fn fast() -> DiscoveryConfig {
    DiscoveryConfig {
        collection_window: Duration::from_millis(200),
        idle_poll_interval: Duration::from_millis(50),
        max_idle_polls: 3,
    }
}

/// Counts what reaches it.
#[derive(Default)]
struct CountingSink {
    recorded: usize,
}

impl HostSink for CountingSink {
    fn record(&mut self, _record: &HostRecord) -> anyhow::Result<()> {
        self.recorded += 1;
        Ok(())
    }
}

fn eth0_link_with_prefix(prefix: u8) -> LocalLink {
    let interfaces = vec![
        ni("lo", 1, None, &[v4(127, 0, 0, 1, 8)], 65609),
        ni("eth0", 2, Some(LOCAL_MAC), &[v4(192, 0, 2, 10, prefix)], 69699),
    ];
    let intf = find_by_name("eth0", &interfaces).unwrap();
    LocalLink::from_interface(&intf).unwrap()
}

fn eth0_link() -> LocalLink {
    eth0_link_with_prefix(24)
}

#[tokio::test]
async fn reply_is_checked_and_written_to_file() {
    let medium = FakeMedium::default();
    medium.inject(arp_reply(PEER_MAC, Ipv4Addr::new(192, 0, 2, 5)));
    let mut transceiver = LocalScanner::with_handle(eth0_link(), medium.handle());

    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("out");
    file::prepare_dir(&out).unwrap();
    let mut sink = FileSink::new(&out);

    let summary = scanner::perform_discovery(&mut transceiver, &fast(), 10039, &AlwaysAlive, &mut sink)
        .await
        .unwrap();

    assert_eq!(summary.requests_sent, 255);
    assert_eq!(medium.sent(), 255);
    assert_eq!(summary.recorded, 1);

    let content = fs::read_to_string(out.join("192.0.2.5.txt")).unwrap();
    assert_eq!(content, "192.0.2.5:10039, aa:bb:cc:dd:ee:ff\n");
    assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
}

#[tokio::test]
async fn own_frames_and_dead_hosts_leave_no_trace() {
    let medium = FakeMedium::default();
    medium.inject(arp_reply(LOCAL_MAC, Ipv4Addr::new(192, 0, 2, 10)));
    medium.inject(arp_reply(PEER_MAC, Ipv4Addr::new(192, 0, 2, 5)));
    let mut transceiver = LocalScanner::with_handle(eth0_link(), medium.handle());

    let tmp = tempfile::tempdir().unwrap();
    let mut sink = FileSink::new(tmp.path());

    let summary = scanner::perform_discovery(&mut transceiver, &fast(), 10039, &NeverAlive, &mut sink)
        .await
        .unwrap();

    assert_eq!(summary.replies, 1);
    assert_eq!(summary.alive, 0);
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn silent_network_finishes_after_idle_polls() {
    let medium = FakeMedium::default();
    let mut transceiver = LocalScanner::with_handle(eth0_link(), medium.handle());
    let tmp = tempfile::tempdir().unwrap();
    let mut sink = FileSink::new(tmp.path());

    let started = Instant::now();
    let summary = scanner::perform_discovery(&mut transceiver, &fast(), 10039, &AlwaysAlive, &mut sink)
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(summary.replies, 0);
    // window + three idle pauses
    assert!(elapsed >= Duration::from_millis(350), "ended too early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(3), "ended too late: {elapsed:?}");
}

/// The capture does not check that a sender belongs to the subnet, which
/// lets a loopback "neighbour" be checked for real.
#[tokio::test]
async fn tcp_check_against_local_listener() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let open_port = listener.local_addr().unwrap().port();

    let medium = FakeMedium::default();
    medium.inject(arp_reply(PEER_MAC, Ipv4Addr::LOCALHOST));
    let mut transceiver = LocalScanner::with_handle(eth0_link(), medium.handle());

    let tmp = tempfile::tempdir().unwrap();
    let mut sink = FileSink::new(tmp.path());

    let summary =
        scanner::perform_discovery(&mut transceiver, &fast(), open_port, &TcpProber::default(), &mut sink)
            .await
            .unwrap();

    assert_eq!(summary.recorded, 1);
    let content = fs::read_to_string(tmp.path().join("127.0.0.1.txt")).unwrap();
    assert_eq!(content, format!("127.0.0.1:{open_port}, aa:bb:cc:dd:ee:ff\n"));
}

#[tokio::test]
async fn udp_check_records_host_into_database() {
    let receiver = std::net::UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let open_port = receiver.local_addr().unwrap().port();

    let medium = FakeMedium::default();
    medium.inject(arp_reply(PEER_MAC, Ipv4Addr::LOCALHOST));
    let mut transceiver = LocalScanner::with_handle(eth0_link(), medium.handle());

    let tmp = tempfile::tempdir().unwrap();
    let db = DatabaseConfig {
        path: tmp.path().join("device.db"),
        table: "device".into(),
    };
    let mut sink = DatabaseSink::open(&db).unwrap();
    let prober = UdpProber {
        spacing: Duration::from_millis(10),
        ..UdpProber::default()
    };

    scanner::perform_discovery(&mut transceiver, &fast(), open_port, &prober, &mut sink)
        .await
        .unwrap();

    let (mac, ip, status): (String, String, i64) = sink
        .connection()
        .query_row(
            "SELECT macAddress, deviceIp, connectionStatus FROM device",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!((mac.as_str(), ip.as_str(), status), ("aa:bb:cc:dd:ee:ff", "127.0.0.1", 0));
}

#[tokio::test]
async fn udp_port_unreachable_keeps_host_out_of_the_sink() {
    let closed_port = {
        let socket = std::net::UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        socket.local_addr().unwrap().port()
    };

    let medium = FakeMedium::default();
    medium.inject(arp_reply(PEER_MAC, Ipv4Addr::LOCALHOST));
    let mut transceiver = LocalScanner::with_handle(eth0_link(), medium.handle());

    let tmp = tempfile::tempdir().unwrap();
    let mut sink = FileSink::new(tmp.path());
    let prober = UdpProber {
        spacing: Duration::from_millis(50),
        ..UdpProber::default()
    };

    let summary = scanner::perform_discovery(&mut transceiver, &fast(), closed_port, &prober, &mut sink)
        .await
        .unwrap();

    assert_eq!(summary.replies, 1);
    assert_eq!(summary.alive, 0);
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn busy_slash16_records_every_responder() {
    let medium = FakeMedium::default();
    for i in 1..=1500u32 {
        let [_, _, c, d] = (0xc000_0000u32 + i).to_be_bytes();
        medium.inject(arp_reply(
            MacAddr::new(0xaa, 0xbb, 0xcc, 0xdd, c, d),
            Ipv4Addr::new(192, 0, c, d),
        ));
    }
    let mut transceiver = LocalScanner::with_handle(eth0_link_with_prefix(16), medium.handle());
    let mut sink = CountingSink::default();

    let summary = scanner::perform_discovery(&mut transceiver, &fast(), 10039, &AlwaysAlive, &mut sink)
        .await
        .unwrap();

    assert_eq!(summary.requests_sent, 65_535);
    assert_eq!(summary.overflowed, 0);
    assert_eq!(summary.replies, 1500);
    assert_eq!(sink.recorded, 1500);
}

#[test]
fn loopback_interface_is_rejected() {
    let lo = ni("lo", 1, Some(MacAddr::zero()), &[v4(127, 0, 0, 1, 8)], 65609);
    assert_eq!(
        LocalLink::from_interface(&lo).unwrap_err(),
        InterfaceError::Loopback(Ipv4Addr::LOCALHOST)
    );
}

#[test]
fn both_outputs_implement_host_sink() {
    fn assert_sink<S: HostSink>() {}
    assert_sink::<FileSink>();
    assert_sink::<DatabaseSink>();
}
