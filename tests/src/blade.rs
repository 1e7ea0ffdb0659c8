//! End-to-end runs of the swap procedures against recorded fakes.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use swappr_common::hardware::{ComponentState, InterfaceRecord};
use swappr_common::xname::ComponentType;
use swappr_core::blade::{BladeServices, SwapInProcedure, SwapOutProcedure, mapping};
use swappr_core::stage::Procedure;

use crate::fakes::{
    FakeDhcp, FakeInventory, FakePods, FakePower, FakeSchedule, RecordingPrompter, component,
    interface, xname,
};

struct Setup {
    inventory: Arc<FakeInventory>,
    power: Arc<FakePower>,
    schedule: Arc<FakeSchedule>,
    pods: Arc<FakePods>,
    dhcp: Arc<FakeDhcp>,
    prompter: Arc<RecordingPrompter>,
}

impl Setup {
    fn new(inventory: FakeInventory, schedule: FakeSchedule, accept_prompt: bool) -> Self {
        Setup {
            inventory: Arc::new(inventory),
            power: Arc::new(FakePower::default()),
            schedule: Arc::new(schedule),
            pods: Arc::new(FakePods {
                names: vec!["dhcp-kea-6b589f55-x4qpr".to_string()],
            }),
            dhcp: Arc::new(FakeDhcp::default()),
            prompter: Arc::new(RecordingPrompter::answering(accept_prompt)),
        }
    }

    fn services(&self) -> BladeServices {
        BladeServices {
            inventory: self.inventory.clone(),
            power: self.power.clone(),
            schedule: self.schedule.clone(),
            pods: self.pods.clone(),
            dhcp: self.dhcp.clone(),
            prompter: self.prompter.clone(),
        }
    }
}

/// A populated slot: two node board controllers, four nodes, management
/// network interfaces on the nodes and on the controllers.
fn removal_inventory(node_state: ComponentState) -> FakeInventory {
    let nmn = "Node Management Network";
    FakeInventory {
        components: vec![
            component("x1000c0b0", ComponentType::ChassisBmc, ComponentState::On),
            component("x1000c0s1b0", ComponentType::NodeBmc, ComponentState::On),
            component("x1000c0s1b1", ComponentType::NodeBmc, ComponentState::On),
            component("x1000c0s1b0n0", ComponentType::Node, node_state.clone()),
            component("x1000c0s1b0n1", ComponentType::Node, node_state.clone()),
            component("x1000c0s1b1n0", ComponentType::Node, node_state.clone()),
            component("x1000c0s1b1n1", ComponentType::Node, node_state),
        ],
        interfaces: Mutex::new(vec![
            interface("ifn0", "x1000c0s1b0n0", nmn, "ab:cd:ef:01:23:45", "10.100.0.1"),
            interface("ifn1", "x1000c0s1b0n1", nmn, "ab:cd:ef:01:23:46", "10.100.0.2"),
            interface("ifn2", "x1000c0s1b1n0", nmn, "ab:cd:ef:01:23:47", "10.100.0.3"),
            interface("ifn3", "x1000c0s1b1n1", nmn, "ab:cd:ef:01:23:48", "10.100.0.4"),
            interface("ifhsn", "x1000c0s1b0n0", "High Speed Network", "02:00:00:00:00:01", "10.150.0.1"),
            interface("ifb0", "x1000c0s1b0", nmn, "de:ad:be:ef:00:01", "10.254.0.1"),
            interface("ifb1", "x1000c0s1b1", nmn, "de:ad:be:ef:00:02", "10.254.0.2"),
        ]),
        ..FakeInventory::default()
    }
}

#[tokio::test(start_paused = true)]
async fn swap_out_runs_all_stages_in_order() {
    let setup = Setup::new(
        removal_inventory(ComponentState::Off),
        FakeSchedule::default(),
        true,
    );
    let dir = tempfile::tempdir().unwrap();
    let mapping_file = dir.path().join("mapping.json");

    let mut procedure =
        SwapOutProcedure::new(xname("x1000c0s1"), mapping_file.clone(), setup.services());
    procedure.procedure().await.unwrap();

    let ops = setup.inventory.ops();

    // Both board controllers had their endpoints disabled, the slot was
    // disabled, and discovery was suspended before anything was deleted.
    assert!(ops.contains(&"set_endpoint_enabled x1000c0s1b0 false".to_string()));
    assert!(ops.contains(&"set_endpoint_enabled x1000c0s1b1 false".to_string()));
    assert!(ops.contains(&"set_enabled x1000c0s1 false".to_string()));
    assert_eq!(*setup.schedule.suspend_calls.lock().unwrap(), vec![true]);

    // The operator saw every board controller in the prompt.
    let prompts = setup.prompter.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("x1000c0s1b0"));
    assert!(prompts[0].contains("x1000c0s1b1"));

    // Every node-attached interface went away, management network or not.
    for deleted in ["ifn0", "ifn1", "ifn2", "ifn3", "ifhsn"] {
        assert!(ops.contains(&format!("delete_interface {deleted}")), "{deleted}");
    }
    assert!(ops.contains(&"delete_endpoint x1000c0s1b0".to_string()));
    assert!(ops.contains(&"delete_endpoint x1000c0s1b1".to_string()));

    // Deletions come after disablement, endpoint deletions after interface
    // deletions.
    let first_delete = ops.iter().position(|op| op.starts_with("delete_interface")).unwrap();
    let last_disable = ops.iter().rposition(|op| op.starts_with("set_")).unwrap();
    let first_endpoint_delete = ops.iter().position(|op| op.starts_with("delete_endpoint")).unwrap();
    assert!(last_disable < first_delete);
    assert!(first_delete < first_endpoint_delete);

    // The slot was powered off recursively.
    assert_eq!(
        *setup.power.transitions.lock().unwrap(),
        vec![(
            vec!["x1000c0s1".to_string()],
            swappr_common::power::PowerState::Off,
            true
        )]
    );

    // The controller management interfaces survived the node-interface
    // deletion and were recorded for the swap-in.
    let stored = mapping::load_mapping(&mapping_file).unwrap();
    let stored_macs: Vec<&str> = stored.iter().map(|r| r.mac_address.as_str()).collect();
    assert_eq!(stored_macs, vec!["de:ad:be:ef:00:01", "de:ad:be:ef:00:02"]);
}

#[tokio::test]
async fn swap_out_rejects_non_slot_components() {
    for non_slot in ["x1000", "x1000c0", "x1000c0s1b0n0"] {
        let setup = Setup::new(
            removal_inventory(ComponentState::Off),
            FakeSchedule::default(),
            true,
        );
        let mut procedure = SwapOutProcedure::new(
            xname(non_slot),
            PathBuf::from("unused.json"),
            setup.services(),
        );

        let err = procedure.procedure().await.unwrap_err();
        assert!(err.to_string().contains("Only slots"), "{non_slot}: {err}");
        assert!(setup.inventory.ops().is_empty());
    }
}

#[tokio::test]
async fn swap_out_rejects_slot_with_nodes_not_off() {
    let setup = Setup::new(
        removal_inventory(ComponentState::Ready),
        FakeSchedule::default(),
        true,
    );
    let mut procedure = SwapOutProcedure::new(
        xname("x1000c0s1"),
        PathBuf::from("unused.json"),
        setup.services(),
    );

    let err = procedure.procedure().await.unwrap_err();
    assert!(err.to_string().contains("powered off"), "{err}");
    assert!(err.to_string().contains("x1000c0s1b0n0"), "{err}");
    assert!(setup.inventory.ops().is_empty());
}

#[tokio::test]
async fn swap_out_aborts_when_operator_declines() {
    let setup = Setup::new(
        removal_inventory(ComponentState::Off),
        FakeSchedule::default(),
        false,
    );
    let dir = tempfile::tempdir().unwrap();
    let mapping_file = dir.path().join("mapping.json");

    let mut procedure =
        SwapOutProcedure::new(xname("x1000c0s1"), mapping_file.clone(), setup.services());

    let err = procedure.procedure().await.unwrap_err();
    assert_eq!(err.to_string(), "Blade swap canceled by user");

    // Nothing was deleted, no power command went out, no mapping written.
    let ops = setup.inventory.ops();
    assert!(!ops.iter().any(|op| op.starts_with("delete_")));
    assert!(setup.power.transitions.lock().unwrap().is_empty());
    assert!(!mapping_file.exists());
}

/// The destination slot after physical insertion: endpoints already
/// rediscovered, nodes present, fresh auto-assigned management interfaces.
fn insertion_inventory() -> FakeInventory {
    let nmn = "Node Management Network";
    let inventory = FakeInventory {
        components: vec![
            component("x3000c0b0", ComponentType::ChassisBmc, ComponentState::On),
            component("x3000c0s0b0", ComponentType::NodeBmc, ComponentState::On),
            component("x3000c0s0b1", ComponentType::NodeBmc, ComponentState::On),
            component("x3000c0s0b0n0", ComponentType::Node, ComponentState::Off),
            component("x3000c0s0b1n0", ComponentType::Node, ComponentState::Off),
        ],
        interfaces: Mutex::new(vec![
            interface("new0", "x3000c0s0b0n0", nmn, "mac3", "10.0.1.11"),
            interface("new1", "x3000c0s0b1n0", nmn, "mac4", "10.0.1.12"),
            interface("newhsn", "x3000c0s0b0n0", "High Speed Network", "mac5", "10.150.1.1"),
            interface("newb0", "x3000c0s0b0", nmn, "mac6", "10.254.1.1"),
        ]),
        ..FakeInventory::default()
    };
    for endpoint in ["x3000c0b0", "x3000c0s0b0", "x3000c0s0b1"] {
        inventory.add_enabled_endpoint(endpoint);
    }
    inventory
}

fn source_mapping_file(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("src-mapping.json");
    let records = vec![
        InterfaceRecord {
            description: "Node Management Network".to_string(),
            component_id: xname("x1000c0s0b0n0"),
            mac_address: "mac1".to_string(),
            ip_address: "10.0.0.11".to_string(),
        },
        InterfaceRecord {
            description: "Node Management Network".to_string(),
            component_id: xname("x1000c0s0b1n0"),
            mac_address: "mac2".to_string(),
            ip_address: "10.0.0.12".to_string(),
        },
    ];
    mapping::store_mapping(&path, &records).unwrap();
    path
}

#[tokio::test(start_paused = true)]
async fn swap_in_runs_all_stages_and_remaps_identity() {
    let setup = Setup::new(insertion_inventory(), FakeSchedule::default(), true);
    let dir = tempfile::tempdir().unwrap();
    let src_mapping = source_mapping_file(&dir);

    let mut procedure =
        SwapInProcedure::new(xname("x3000c0s0"), src_mapping, None, setup.services());
    procedure.procedure().await.unwrap();

    let ops = setup.inventory.ops();
    assert!(ops.contains(&"set_enabled x3000c0s0 true".to_string()));
    assert!(ops.contains(&"bulk_enable x3000c0s0b0n0,x3000c0s0b1n0".to_string()));
    assert!(ops.contains(&"begin_discovery x3000c0s0".to_string()));

    // Only the stale node management interfaces were deleted.
    assert!(ops.contains(&"delete_interface new0".to_string()));
    assert!(ops.contains(&"delete_interface new1".to_string()));
    assert!(!ops.contains(&"delete_interface newhsn".to_string()));
    assert!(!ops.contains(&"delete_interface newb0".to_string()));

    assert_eq!(
        *setup.power.transitions.lock().unwrap(),
        vec![(
            vec!["x3000c0s0".to_string()],
            swappr_common::power::PowerState::On,
            true
        )]
    );
    assert_eq!(*setup.schedule.suspend_calls.lock().unwrap(), vec![false]);

    // The merged mapping keeps the old MACs on the new location and IPs.
    let applied = setup.dhcp.applied.lock().unwrap();
    assert_eq!(applied.len(), 1);
    let reservations: Vec<(String, String, String)> = applied[0]
        .iter()
        .map(|r| {
            (
                r.component_id.to_string(),
                r.ip_address.clone(),
                r.mac_address.clone(),
            )
        })
        .collect();
    assert_eq!(
        reservations,
        vec![
            (
                "x3000c0s0b0n0".to_string(),
                "10.0.1.11".to_string(),
                "mac1".to_string()
            ),
            (
                "x3000c0s0b1n0".to_string(),
                "10.0.1.12".to_string(),
                "mac2".to_string()
            ),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn swap_in_fails_when_an_endpoint_never_reappears() {
    let inventory = insertion_inventory();
    inventory
        .endpoints
        .lock()
        .unwrap()
        .remove("x3000c0s0b1");
    let setup = Setup::new(inventory, FakeSchedule::default(), true);
    let dir = tempfile::tempdir().unwrap();
    let src_mapping = source_mapping_file(&dir);

    let mut procedure =
        SwapInProcedure::new(xname("x3000c0s0"), src_mapping, None, setup.services());

    let err = procedure.procedure().await.unwrap_err();
    assert!(err.to_string().contains("were not rediscovered"), "{err}");
    assert!(err.to_string().contains("x3000c0s0b1"), "{err}");

    // The procedure failed before the slot was touched.
    assert!(!setup.inventory.ops().iter().any(|op| op.starts_with("set_enabled")));
}

#[tokio::test(start_paused = true)]
async fn swap_in_skips_discovery_wait_when_resume_fails() {
    let setup = Setup::new(
        insertion_inventory(),
        FakeSchedule {
            fail_updates: true,
            ..FakeSchedule::default()
        },
        true,
    );
    let dir = tempfile::tempdir().unwrap();
    let src_mapping = source_mapping_file(&dir);

    let mut procedure =
        SwapInProcedure::new(xname("x3000c0s0"), src_mapping, None, setup.services());

    let err = procedure.procedure().await.unwrap_err();
    assert!(err.to_string().contains("Failed to resume"), "{err}");

    // The scheduled-cycle wait was never attempted.
    assert_eq!(*setup.schedule.queries.lock().unwrap(), 0);
}
