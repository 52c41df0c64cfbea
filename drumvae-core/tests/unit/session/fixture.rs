use super::*;
use crate::server::protocol::ServerPayload;

fn ticket(seq: u64, endpoint: Endpoint) -> RequestTicket {
    RequestTicket { seq, endpoint }
}

fn canned_error(endpoint: Endpoint, msg: &str) -> CannedResponse {
    CannedResponse {
        endpoint,
        response: None,
        error: Some(msg.to_owned()),
    }
}

#[test]
fn replies_arrive_after_latency() {
    let clock = ManualClock::new();
    let mut server = FixtureServer::new(clock.clone(), 100.0, 0, Vec::new());
    clock.set(TimeMs(20.0));
    server
        .submit(ticket(1, Endpoint::Static), InferenceRequest::Static)
        .unwrap();
    assert_eq!(server.submitted(), 1);

    assert!(server.take_due(TimeMs(119.0)).is_empty());
    let due = server.take_due(TimeMs(120.0));
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].due, TimeMs(120.0));
    assert_eq!(server.pending(), 0);
}

#[test]
fn simultaneous_replies_come_back_in_ticket_order() {
    let clock = ManualClock::new();
    let mut server = FixtureServer::new(clock, 50.0, 0, Vec::new());
    server
        .submit(ticket(3, Endpoint::Static), InferenceRequest::Static)
        .unwrap();
    server
        .submit(
            ticket(2, Endpoint::AdjustLatent),
            InferenceRequest::AdjustLatent {
                latent: crate::model::latent::Latent::zeros(),
            },
        )
        .unwrap();

    let due = server.take_due(TimeMs(50.0));
    let order: Vec<u64> = due.iter().map(|d| d.ticket.seq).collect();
    assert_eq!(order, vec![2, 3]);
    assert!(ticket(2, Endpoint::Static) < ticket(2, Endpoint::AdjustData));
    assert!(ticket(1, Endpoint::AdjustLatent) < ticket(2, Endpoint::Rand));
}

#[test]
fn random_replies_are_valid_payloads() {
    let clock = ManualClock::new();
    let mut server = FixtureServer::new(clock, 0.0, 3, Vec::new());
    server
        .submit(ticket(1, Endpoint::Rand), InferenceRequest::Rand)
        .unwrap();
    let mut due = server.take_due(TimeMs(0.0));
    match due.pop().unwrap().reply {
        FixtureReply::Respond(r) => {
            ServerPayload::try_from(r).unwrap();
        }
        FixtureReply::Fail(msg) => panic!("unexpected failure {msg}"),
    }
}

#[test]
fn canned_replies_are_consumed_per_endpoint() {
    let clock = ManualClock::new();
    let mut server = FixtureServer::new(
        clock,
        10.0,
        0,
        vec![
            canned_error(Endpoint::Rand, "first"),
            canned_error(Endpoint::Rand, "second"),
        ],
    );
    server
        .submit(ticket(1, Endpoint::Static), InferenceRequest::Static)
        .unwrap();
    server
        .submit(ticket(2, Endpoint::Rand), InferenceRequest::Rand)
        .unwrap();
    server
        .submit(ticket(3, Endpoint::Rand), InferenceRequest::Rand)
        .unwrap();
    server
        .submit(ticket(4, Endpoint::Rand), InferenceRequest::Rand)
        .unwrap();

    let due = server.take_due(TimeMs(10.0));
    let seqs: Vec<u64> = due.iter().map(|d| d.ticket.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3, 4]);
    assert!(matches!(due[0].reply, FixtureReply::Respond(_)));
    assert!(matches!(&due[1].reply, FixtureReply::Fail(m) if m == "first"));
    assert!(matches!(&due[2].reply, FixtureReply::Fail(m) if m == "second"));
    assert!(matches!(due[3].reply, FixtureReply::Respond(_)));
}

#[test]
fn same_seed_gives_same_replies() {
    let run = || {
        let mut server = FixtureServer::new(ManualClock::new(), 0.0, 11, Vec::new());
        server
            .submit(ticket(1, Endpoint::Rand), InferenceRequest::Rand)
            .unwrap();
        match server.take_due(TimeMs(0.0)).pop().unwrap().reply {
            FixtureReply::Respond(r) => r.latent.unwrap(),
            FixtureReply::Fail(_) => unreachable!(),
        }
    };
    assert_eq!(run(), run());
}
