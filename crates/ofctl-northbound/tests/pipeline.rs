//! End-to-end pipeline scenarios.
//!
//! These wire real devices, a recording event sender, and small
//! applications together the way the controller process does: register,
//! enable in dependency order, wire the sender, then push events through
//! the chain head.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use ofctl_network::{Device, Event, PortValue, Watcher};
use ofctl_northbound::{
    BaseProcessor, EventSender, Manager, NorthboundConfig, NorthboundError, Processor,
};

struct NullWatcher;

#[async_trait]
impl Watcher for NullWatcher {
    async fn device_removed(&self, _device: Arc<Device>) {}
}

/// Records which applications saw an event, in order; optionally consumes
/// it instead of forwarding.
struct TracingApp {
    name: &'static str,
    deps: Vec<String>,
    consume: bool,
    visits: Arc<Mutex<Vec<String>>>,
    base: BaseProcessor,
}

impl TracingApp {
    fn new(name: &'static str, deps: &[&str], visits: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            deps: deps.iter().map(|d| d.to_string()).collect(),
            consume: false,
            visits: Arc::clone(visits),
            base: BaseProcessor::new(),
        })
    }

    fn consuming(name: &'static str, visits: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            deps: Vec::new(),
            consume: true,
            visits: Arc::clone(visits),
            base: BaseProcessor::new(),
        })
    }
}

#[async_trait]
impl Processor for TracingApp {
    fn name(&self) -> &str {
        self.name
    }

    async fn init(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn dependencies(&self) -> Vec<String> {
        self.deps.clone()
    }

    fn next(&self) -> Option<Arc<dyn Processor>> {
        self.base.next()
    }

    fn set_next(&self, next: Arc<dyn Processor>) {
        self.base.set_next(next);
    }

    async fn on_event(&self, event: Event) -> anyhow::Result<()> {
        self.visits.lock().unwrap().push(self.name.to_string());
        if self.consume {
            return Ok(());
        }
        self.base.forward(event).await
    }
}

/// Event sender standing in for the I/O layer: keeps the listener handle
/// it was wired with so the test can push events at the chain head.
struct FakeSender {
    listener: Mutex<Option<Arc<dyn Processor>>>,
}

impl FakeSender {
    fn new() -> Self {
        Self {
            listener: Mutex::new(None),
        }
    }

    async fn emit(&self, event: Event) -> anyhow::Result<()> {
        let listener = self.listener.lock().unwrap().clone();
        match listener {
            Some(listener) => listener.on_event(event).await,
            None => Ok(()),
        }
    }
}

impl EventSender for FakeSender {
    fn set_event_listener(&self, listener: Arc<dyn Processor>) {
        *self.listener.lock().unwrap() = Some(listener);
    }
}

#[tokio::test]
async fn dependency_order_is_caller_controlled() {
    let visits = Arc::new(Mutex::new(Vec::new()));
    let a = TracingApp::new("a", &[], &visits);
    let b = TracingApp::new("b", &["a"], &visits);
    let mgr = Manager::new([a as Arc<dyn Processor>, b as Arc<dyn Processor>]);

    // B first: its dependency on A is unmet.
    let err = mgr.enable("b").await.unwrap_err();
    assert!(matches!(err, NorthboundError::DependencyNotLoaded { .. }));
    assert!(mgr.dump().await.is_empty());

    // A then B succeeds and the chain visits A before B.
    mgr.enable("a").await.unwrap();
    mgr.enable("b").await.unwrap();
    assert_eq!(mgr.dump().await, vec!["a".to_string(), "b".to_string()]);

    let sender = FakeSender::new();
    mgr.add_event_sender(&sender).await;
    sender.emit(Event::TopologyChanged).await.unwrap();

    assert_eq!(
        visits.lock().unwrap().as_slice(),
        &["a".to_string(), "b".to_string()]
    );
}

#[tokio::test]
async fn consuming_application_ends_propagation() {
    let visits = Arc::new(Mutex::new(Vec::new()));
    let filter = TracingApp::consuming("filter", &visits);
    let tail = TracingApp::new("tail", &[], &visits);
    let mgr = Manager::new([filter as Arc<dyn Processor>, tail as Arc<dyn Processor>]);

    mgr.enable("filter").await.unwrap();
    mgr.enable("tail").await.unwrap();

    let sender = FakeSender::new();
    mgr.add_event_sender(&sender).await;
    sender.emit(Event::TopologyChanged).await.unwrap();

    assert_eq!(visits.lock().unwrap().as_slice(), &["filter".to_string()]);
}

#[tokio::test]
async fn config_driven_activation_feeds_device_events_through_chain() {
    let visits = Arc::new(Mutex::new(Vec::new()));
    let discovery = TracingApp::new("discovery", &[], &visits);
    let l2switch = TracingApp::new("l2switch", &["discovery"], &visits);
    let mgr = Manager::new([
        discovery as Arc<dyn Processor>,
        l2switch as Arc<dyn Processor>,
    ]);

    let config = NorthboundConfig::from_yaml(
        "applications:\n  - discovery\n  - l2switch\n",
    )
    .unwrap();
    mgr.enable_all(&config.applications).await.unwrap();

    let sender = FakeSender::new();
    mgr.add_event_sender(&sender).await;

    let device = Device::new("of:0000000000000001", Arc::new(NullWatcher));
    device
        .update_port(
            1,
            PortValue {
                name: "eth1/1".to_string(),
                admin_up: true,
                link_up: true,
                ..PortValue::default()
            },
        )
        .await;
    let port = device.port(1).await.unwrap();

    sender.emit(Event::DeviceUp(device.clone())).await.unwrap();
    sender
        .emit(Event::PortUp(device.clone(), port))
        .await
        .unwrap();
    sender
        .emit(Event::PacketIn {
            device,
            in_port: 1,
            frame: vec![0u8; 64],
        })
        .await
        .unwrap();

    // Three events, each visiting discovery then l2switch.
    assert_eq!(
        visits.lock().unwrap().as_slice(),
        &[
            "discovery".to_string(),
            "l2switch".to_string(),
            "discovery".to_string(),
            "l2switch".to_string(),
            "discovery".to_string(),
            "l2switch".to_string()
        ]
    );
}

#[tokio::test]
async fn sender_wired_before_enables_stays_unwired() {
    let visits = Arc::new(Mutex::new(Vec::new()));
    let app = TracingApp::new("discovery", &[], &visits);
    let mgr = Manager::new([app as Arc<dyn Processor>]);

    // Wiring against an empty chain is a documented no-op; the caller must
    // re-wire after enabling.
    let sender = FakeSender::new();
    mgr.add_event_sender(&sender).await;

    mgr.enable("discovery").await.unwrap();
    sender.emit(Event::TopologyChanged).await.unwrap();
    assert!(visits.lock().unwrap().is_empty());

    mgr.add_event_sender(&sender).await;
    sender.emit(Event::TopologyChanged).await.unwrap();
    assert_eq!(visits.lock().unwrap().as_slice(), &["discovery".to_string()]);
}
