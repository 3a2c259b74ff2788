//! Integration tests for the swap service actor.

use roomswap::prelude::*;

// =========================================================================
// Helpers
// =========================================================================

fn room(id: &str) -> RoomId {
    RoomId::new(id)
}

fn hostel_snapshot() -> SwapSnapshot {
    SwapSnapshot {
        rooms: (0..20u8)
            .map(|i| {
                RoomEntry::new(
                    format!("R{}", 101 + u32::from(i)).as_str(),
                    format!("Student_{}", char::from(b'A' + i)).as_str(),
                )
            })
            .collect(),
        requests: Vec::new(),
    }
}

fn occupant_of(snapshot: &SwapSnapshot, id: &str) -> Option<String> {
    snapshot
        .rooms
        .iter()
        .find(|e| e.room_id.as_str() == id)
        .map(|e| e.occupant.as_str().to_string())
}

/// A store whose writes all fail once `writes_allowed` is used up,
/// including the writes a rollback would need.
struct BrokenStore {
    inner: RoomRegistry,
    writes_allowed: usize,
}

impl OccupancyStore for BrokenStore {
    fn occupant(&self, room: &RoomId) -> Option<&OccupantId> {
        self.inner.occupant(room)
    }

    fn assign(&mut self, room: &RoomId, occupant: OccupantId) -> Result<(), StoreError> {
        if self.writes_allowed == 0 {
            return Err(StoreError::WriteFailed {
                room: room.clone(),
                reason: "connection reset".into(),
            });
        }
        self.writes_allowed -= 1;
        self.inner.assign(room, occupant)
    }

    fn entries(&self) -> Vec<RoomEntry> {
        self.inner.entries()
    }
}

// =========================================================================
// Builder
// =========================================================================

#[tokio::test]
async fn test_builder_loads_rooms_and_requests() {
    let service = SwapService::builder()
        .room(RoomEntry::new("R101", "Student_A"))
        .room(RoomEntry::new("R102", "Student_B"))
        .request(SwapEdge::new("R101", "R102"))
        .spawn()
        .unwrap();

    let snapshot = service.snapshot().await.unwrap();

    assert_eq!(snapshot.rooms.len(), 2);
    assert_eq!(snapshot.requests, vec![SwapEdge::new("R101", "R102")]);
}

#[tokio::test]
async fn test_builder_rejects_duplicate_rooms() {
    let result = SwapService::builder()
        .room(RoomEntry::new("R101", "Student_A"))
        .room(RoomEntry::new("R101", "Student_B"))
        .spawn();

    assert!(matches!(
        result,
        Err(RoomSwapError::Engine(EngineError::DuplicateRoom(_)))
    ));
}

#[tokio::test]
async fn test_builder_snapshot_from_json() {
    let json = br#"{
        "rooms": [
            {"room_id": "R101", "occupant": "Student_A"},
            {"room_id": "R102", "occupant": "Student_B"}
        ],
        "requests": [
            {"from": "R101", "to": "R102"},
            {"from": "R102", "to": "R101"}
        ]
    }"#;
    let snapshot = JsonCodec.decode_snapshot(json).unwrap();
    let service = SwapService::builder().snapshot(snapshot).spawn().unwrap();

    let report = service.run_pass_all().await.unwrap();

    let encoded = JsonCodec.encode(&report).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
    assert_eq!(value["cycles"][0]["rooms"], serde_json::json!(["R101", "R102"]));
}

// =========================================================================
// Requests and passes
// =========================================================================

#[tokio::test]
async fn test_concurrent_submissions_then_pass() {
    let service = SwapService::builder()
        .snapshot(hostel_snapshot())
        .spawn()
        .unwrap();

    let edges = [
        ("R105", "R106"),
        ("R106", "R107"),
        ("R107", "R105"),
        ("R110", "R111"),
    ];
    let mut tasks = Vec::new();
    for (from, to) in edges {
        let svc = service.clone();
        tasks.push(tokio::spawn(async move {
            svc.submit_request(SwapEdge::new(from, to)).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let report = service.run_pass_all().await.unwrap();
    let snapshot = service.snapshot().await.unwrap();

    assert_eq!(report.cycles.len(), 1);
    assert_eq!(occupant_of(&snapshot, "R105").as_deref(), Some("Student_F"));
    assert_eq!(occupant_of(&snapshot, "R106").as_deref(), Some("Student_G"));
    assert_eq!(occupant_of(&snapshot, "R107").as_deref(), Some("Student_E"));
    assert_eq!(snapshot.requests, vec![SwapEdge::new("R110", "R111")]);
}

#[tokio::test]
async fn test_run_pass_with_explicit_candidates() {
    let service = SwapService::builder()
        .snapshot(hostel_snapshot())
        .request(SwapEdge::new("R101", "R102"))
        .request(SwapEdge::new("R102", "R101"))
        .request(SwapEdge::new("R103", "R104"))
        .request(SwapEdge::new("R104", "R103"))
        .spawn()
        .unwrap();

    let report = service.run_pass(vec![room("R103")]).await.unwrap();

    assert_eq!(report.cycles.len(), 1);
    assert_eq!(report.cycles[0].rooms, vec![room("R103"), room("R104")]);
    let snapshot = service.snapshot().await.unwrap();
    assert_eq!(snapshot.requests.len(), 2, "R101/R102 were not candidates");
}

#[tokio::test]
async fn test_reject_policy_surfaces_duplicate_request() {
    let service = SwapService::builder()
        .config(PassConfig {
            edge_policy: EdgePolicy::Reject,
            ..PassConfig::default()
        })
        .snapshot(hostel_snapshot())
        .spawn()
        .unwrap();

    service
        .submit_request(SwapEdge::new("R101", "R102"))
        .await
        .unwrap();
    let result = service.submit_request(SwapEdge::new("R101", "R103")).await;

    assert!(matches!(
        result,
        Err(RoomSwapError::Engine(EngineError::DuplicateRequest { .. }))
    ));
}

#[tokio::test]
async fn test_withdrawn_request_breaks_cycle() {
    let service = SwapService::builder()
        .snapshot(hostel_snapshot())
        .request(SwapEdge::new("R101", "R102"))
        .request(SwapEdge::new("R102", "R101"))
        .spawn()
        .unwrap();

    let withdrawn = service.withdraw_request(room("R102")).await.unwrap();
    let report = service.run_pass_all().await.unwrap();

    assert_eq!(withdrawn, Some(room("R101")));
    assert!(report.is_noop());
}

#[tokio::test]
async fn test_state_report_after_pass() {
    let service = SwapService::builder()
        .snapshot(hostel_snapshot())
        .request(SwapEdge::new("R101", "R102"))
        .request(SwapEdge::new("R102", "R101"))
        .request(SwapEdge::new("R115", "R116"))
        .spawn()
        .unwrap();

    service.run_pass_all().await.unwrap();
    let report = service.state_report().await.unwrap();

    assert_eq!(report.len(), 20);
    assert_eq!(report.pending(), 1);
    let text = report.to_string();
    assert!(text.contains("R101    | Student_B     | No"));
    assert!(text.contains("R115    | Student_O     | WANTS R116"));
}

// =========================================================================
// Failure handling
// =========================================================================

#[tokio::test]
async fn test_graph_error_does_not_halt_service() {
    let service = SwapService::builder()
        .config(PassConfig {
            max_walk_len: 1,
            ..PassConfig::default()
        })
        .snapshot(hostel_snapshot())
        .request(SwapEdge::new("R101", "R102"))
        .request(SwapEdge::new("R102", "R101"))
        .spawn()
        .unwrap();

    let err = service.run_pass_all().await.unwrap_err();
    assert!(matches!(err, RoomSwapError::Engine(EngineError::Graph(_))));
    assert!(!err.is_fatal());

    // Still accepting work.
    service
        .submit_request(SwapEdge::new("R103", "R103"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_partial_commit_poisons_service() {
    let mut inner = RoomRegistry::new();
    for entry in hostel_snapshot().rooms {
        inner.insert(entry);
    }
    let mut engine = SwapEngine::with_store(
        BrokenStore {
            inner,
            writes_allowed: 1,
        },
        PassConfig::default(),
    );
    engine.submit_request(SwapEdge::new("R101", "R102")).unwrap();
    engine.submit_request(SwapEdge::new("R102", "R101")).unwrap();
    let service = SwapService::spawn(engine);

    let err = service.run_pass_all().await.unwrap_err();
    assert!(err.is_fatal());

    let next = service.submit_request(SwapEdge::new("R103", "R104")).await;
    assert!(matches!(
        next,
        Err(RoomSwapError::Service(ServiceError::Poisoned))
    ));
    let pass = service.run_pass_all().await;
    assert!(matches!(
        pass,
        Err(RoomSwapError::Service(ServiceError::Poisoned))
    ));

    // Reads still work so an operator can inspect the damage.
    let snapshot = service.snapshot().await.unwrap();
    assert_eq!(snapshot.rooms.len(), 20);
}

#[tokio::test]
async fn test_shutdown_makes_service_unavailable() {
    let service = SwapService::builder()
        .snapshot(hostel_snapshot())
        .spawn()
        .unwrap();

    service.shutdown().await.unwrap();

    let result = service.snapshot().await;
    assert!(matches!(
        result,
        Err(RoomSwapError::Service(ServiceError::Unavailable))
    ));
}
