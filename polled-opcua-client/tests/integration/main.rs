//! End-to-end tests driving the client against a scripted server wired in at
//! the transport seam.

mod harness;

use std::{
    cell::RefCell,
    rc::Rc,
    time::{Duration, Instant},
};

use harness::{default_handler, good_header, MockServer};

use opcua_client::{ClientBuilder, ClientState};
use opcua_core::RequestMessage;
use opcua_types::{
    DataValue, NodeId, NotificationMessage, PublishResponse, ReadRequest, ReadValueId,
    StatusCode, TimestampsToReturn, Variant, WriteRequest, WriteValue,
};

const ENDPOINT: &str = "opc.tcp://127.0.0.1:4840";

fn read_request(node: u32) -> ReadRequest {
    ReadRequest {
        request_header: Default::default(),
        max_age: 0.0,
        timestamps_to_return: TimestampsToReturn::Both,
        nodes_to_read: Some(vec![ReadValueId::from(NodeId::new(0, node))]),
    }
}

fn write_request(node: u32, value: i32) -> WriteRequest {
    WriteRequest {
        request_header: Default::default(),
        nodes_to_write: Some(vec![WriteValue {
            node_id: NodeId::new(0, node),
            attribute_id: 13,
            index_range: Default::default(),
            value: DataValue::from(Variant::Int32(value)),
        }]),
    }
}

#[test]
fn connect_progresses_through_every_layer() {
    let server = MockServer::new();
    let mut client = server.client(ClientBuilder::new());
    let states = harness::record_states(&mut client);

    assert_eq!(client.state(), ClientState::Disconnected);
    client.connect(ENDPOINT).unwrap();
    assert_eq!(client.state(), ClientState::Session);
    assert_eq!(
        *states.borrow(),
        vec![
            ClientState::Connected,
            ClientState::SecureChannel,
            ClientState::Session
        ]
    );
}

#[test]
fn connect_to_unreachable_server_leaves_disconnected() {
    let server = MockServer::new();
    server.refuse_connections();
    let mut client = server.client(ClientBuilder::new().sync_timeout(Duration::from_millis(500)));

    let started = Instant::now();
    let err = client.connect(ENDPOINT).unwrap_err();
    assert_eq!(err, StatusCode::BadConnectionRejected);
    assert_eq!(client.state(), ClientState::Disconnected);
    assert!(started.elapsed() < Duration::from_millis(500));
}

#[test]
fn invalid_url_is_rejected() {
    let server = MockServer::new();
    let mut client = server.client(ClientBuilder::new());
    assert_eq!(
        client.connect("http://localhost").unwrap_err(),
        StatusCode::BadTcpEndpointUrlInvalid
    );
    assert_eq!(client.state(), ClientState::Disconnected);
}

#[test]
fn read_then_disconnect() {
    let server = MockServer::new();
    server.set_handler(|state, id, request| match request {
        RequestMessage::Read(r) => {
            let response = opcua_types::ReadResponse {
                response_header: good_header(r.request_header.request_handle),
                results: Some(vec![DataValue::new_now(Variant::Int32(42))]),
                diagnostic_infos: None,
            };
            state.respond(id, response);
        }
        other => default_handler(state, id, other),
    });

    let mut client = server.client(ClientBuilder::new());
    client.connect(ENDPOINT).unwrap();

    let response = client.read(read_request(2258)).unwrap();
    let results = response.results.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].value, Some(Variant::Int32(42)));

    client.disconnect().unwrap();
    assert_eq!(client.state(), ClientState::Disconnected);

    // The server saw a session close and a channel close, in that order.
    let state = server.state.borrow();
    let saw_close_session = state
        .requests
        .iter()
        .position(|(_, r)| matches!(r, RequestMessage::CloseSession(_)));
    let saw_close_channel = state
        .requests
        .iter()
        .position(|(_, r)| matches!(r, RequestMessage::CloseSecureChannel(_)));
    assert!(saw_close_session.unwrap() < saw_close_channel.unwrap());
}

#[test]
fn out_of_order_async_responses_each_complete_once() {
    let server = MockServer::new();
    let stashed = Rc::new(RefCell::new(Vec::new()));
    let stash = stashed.clone();
    server.set_handler(move |state, id, request| match request {
        RequestMessage::Write(r) => {
            stash
                .borrow_mut()
                .push((id, r.request_header.request_handle));
            // Respond once all three writes have arrived, last first, first
            // second, second last.
            let mut stash = stash.borrow_mut();
            if stash.len() == 3 {
                for &(id, handle) in [2usize, 0, 1].iter().map(|i| &stash[*i]) {
                    let response = opcua_types::WriteResponse {
                        response_header: good_header(handle),
                        results: Some(vec![StatusCode::Good]),
                        diagnostic_infos: None,
                    };
                    state.respond(id, response);
                }
                stash.clear();
            }
        }
        other => default_handler(state, id, other),
    });

    let mut client = server.client(ClientBuilder::new());
    client.connect(ENDPOINT).unwrap();

    let completions: Rc<RefCell<Vec<(usize, u32)>>> = Rc::new(RefCell::new(Vec::new()));
    let mut issued = Vec::new();
    for i in 0..3usize {
        let completions = completions.clone();
        let request_id = client
            .send_async(write_request(100 + i as u32, i as i32), move |_, id, response| {
                assert!(!response.response_header.service_result.is_bad());
                completions.borrow_mut().push((i, id));
            })
            .unwrap();
        issued.push(request_id);
    }

    let deadline = Instant::now() + Duration::from_secs(2);
    while completions.borrow().len() < 3 && Instant::now() < deadline {
        client.run(Duration::from_millis(10));
    }

    // Every callback fired exactly once with its own request id, in the
    // server's completion order.
    let completions = completions.borrow();
    assert_eq!(completions.len(), 3);
    assert_eq!(completions[0], (2, issued[2]));
    assert_eq!(completions[1], (0, issued[0]));
    assert_eq!(completions[2], (1, issued[1]));
}

#[test]
fn repeated_callbacks_fire_on_schedule() {
    // No connection at all: the loop just runs timers.
    let server = MockServer::new();
    let mut client = server.client(ClientBuilder::new());

    let fires: Rc<RefCell<(u32, u32)>> = Rc::new(RefCell::new((0, 0)));
    let a_fires = fires.clone();
    let b_fires = fires.clone();
    let a_times: Rc<RefCell<Vec<Instant>>> = Rc::new(RefCell::new(Vec::new()));
    let a_record = a_times.clone();

    let t0 = Instant::now();
    client
        .add_repeated_callback(Duration::from_millis(100), move |_| {
            a_fires.borrow_mut().0 += 1;
            a_record.borrow_mut().push(Instant::now());
        })
        .unwrap();
    client
        .add_repeated_callback(Duration::from_millis(250), move |_| {
            b_fires.borrow_mut().1 += 1;
        })
        .unwrap();

    while t0.elapsed() < Duration::from_millis(1020) {
        client.run(Duration::from_millis(10));
    }

    let (a, b) = *fires.borrow();
    assert_eq!(a, 10);
    assert_eq!(b, 4);

    // Drift-free: the N-th fire happens at its scheduled time, late only by
    // the loop's sleep quantum.
    for (i, fired_at) in a_times.borrow().iter().enumerate() {
        let scheduled = t0 + Duration::from_millis(100 * (i as u64 + 1));
        assert!(*fired_at >= scheduled);
        assert!(
            fired_at.duration_since(scheduled) < Duration::from_millis(20),
            "fire {} drifted by {:?}",
            i,
            fired_at.duration_since(scheduled)
        );
    }
}

#[test]
fn timer_interval_boundaries() {
    let server = MockServer::new();
    let mut client = server.client(ClientBuilder::new());
    assert_eq!(
        client
            .add_repeated_callback(Duration::from_millis(4), |_| {})
            .unwrap_err(),
        StatusCode::BadInvalidArgument
    );
    assert!(client
        .add_repeated_callback(Duration::from_millis(5), |_| {})
        .is_ok());
}

#[test]
fn blackholed_sync_call_times_out() {
    let server = MockServer::new();
    server.set_handler(|state, id, request| match request {
        // Swallow reads without responding.
        RequestMessage::Read(_) => {}
        other => default_handler(state, id, other),
    });

    let timeout = Duration::from_millis(200);
    let mut client = server.client(ClientBuilder::new().sync_timeout(timeout));
    client.connect(ENDPOINT).unwrap();

    let started = Instant::now();
    let err = client.read(read_request(2258)).unwrap_err();
    assert_eq!(err, StatusCode::BadTimeout);
    let elapsed = started.elapsed();
    assert!(elapsed >= timeout);
    assert!(elapsed < timeout * 4);

    // The pending entry is gone: a served request afterwards works normally.
    server.set_handler(|state, id, request| match request {
        RequestMessage::Read(r) => {
            let response = opcua_types::ReadResponse {
                response_header: good_header(r.request_header.request_handle),
                results: Some(vec![DataValue::new_now(Variant::Int32(1))]),
                diagnostic_infos: None,
            };
            state.respond(id, response);
        }
        other => default_handler(state, id, other),
    });
    assert!(client.read(read_request(2258)).is_ok());
}

#[test]
fn connection_killed_mid_flight_fails_the_call_and_disconnects() {
    let server = MockServer::new();
    server.set_handler(|state, id, request| match request {
        RequestMessage::Browse(_) => state.kill_connection(),
        other => default_handler(state, id, other),
    });

    let timeout = Duration::from_secs(2);
    let mut client = server.client(ClientBuilder::new().sync_timeout(timeout));
    client.connect(ENDPOINT).unwrap();
    let states = harness::record_states(&mut client);

    let request = opcua_types::BrowseRequest {
        request_header: Default::default(),
        view: Default::default(),
        requested_max_references_per_node: 0,
        nodes_to_browse: Some(vec![opcua_types::BrowseDescription {
            node_id: NodeId::new(0, 85u32),
            browse_direction: opcua_types::BrowseDirection::Forward,
            reference_type_id: NodeId::null(),
            include_subtypes: true,
            node_class_mask: 0,
            result_mask: 0,
        }]),
    };

    let started = Instant::now();
    let err = client.browse(request).unwrap_err();
    assert_eq!(err, StatusCode::BadSecureChannelClosed);
    assert!(started.elapsed() < timeout);
    assert_eq!(client.state(), ClientState::Disconnected);
    assert_eq!(*states.borrow(), vec![ClientState::Disconnected]);
}

#[test]
fn pending_async_requests_fail_with_shutdown_on_disconnect() {
    let server = MockServer::new();
    server.set_handler(|state, id, request| match request {
        RequestMessage::Write(_) => {}
        other => default_handler(state, id, other),
    });

    let mut client = server.client(ClientBuilder::new());
    client.connect(ENDPOINT).unwrap();

    let outcome: Rc<RefCell<Option<StatusCode>>> = Rc::new(RefCell::new(None));
    let seen = outcome.clone();
    client
        .send_async(write_request(1, 1), move |_, _, response: opcua_types::WriteResponse| {
            *seen.borrow_mut() = Some(response.response_header.service_result);
        })
        .unwrap();

    client.disconnect().unwrap();
    assert_eq!(*outcome.borrow(), Some(StatusCode::BadShutdown));
    assert_eq!(client.state(), ClientState::Disconnected);
}

#[test]
fn inflight_limit_rejects_excess_dispatches() {
    let server = MockServer::new();
    server.set_handler(|state, id, request| match request {
        RequestMessage::Write(_) => {}
        other => default_handler(state, id, other),
    });

    let mut client = server.client(ClientBuilder::new().max_inflight_messages(1));
    client.connect(ENDPOINT).unwrap();

    client.send_async(write_request(1, 1), |_, _, _| {}).unwrap();
    let err = client
        .send_async(write_request(2, 2), |_, _, _| {})
        .unwrap_err();
    assert_eq!(err, StatusCode::BadTooManyOperations);
}

#[test]
fn channel_renewal_under_a_live_session() {
    let server = MockServer::new();
    server.set_handler(|state, id, request| match request {
        RequestMessage::Read(r) => {
            let response = opcua_types::ReadResponse {
                response_header: good_header(r.request_header.request_handle),
                results: Some(vec![DataValue::new_now(Variant::Int32(0))]),
                diagnostic_infos: None,
            };
            state.respond(id, response);
        }
        other => default_handler(state, id, other),
    });

    // A one second lifetime renews after 750 ms, checked every 250 ms.
    let mut client = server.client(ClientBuilder::new().channel_lifetime(1_000));
    client.connect(ENDPOINT).unwrap();
    let states = harness::record_states(&mut client);
    assert_eq!(server.state.borrow().token_id(), 1);

    let started = Instant::now();
    while started.elapsed() < Duration::from_millis(1_300) {
        client.run(Duration::from_millis(20));
    }

    // A fresh token was installed without tearing the session down.
    assert_eq!(server.state.borrow().token_id(), 2);
    assert_eq!(client.state(), ClientState::SessionRenewed);
    assert!(states.borrow().contains(&ClientState::SessionRenewed));

    // The next successful service call confirms the session.
    client.read(read_request(2258)).unwrap();
    assert_eq!(client.state(), ClientState::Session);
}

#[test]
fn manual_renewal_moves_to_session_renewed() {
    let server = MockServer::new();
    let mut client = server.client(ClientBuilder::new());
    client.connect(ENDPOINT).unwrap();

    client.renew_secure_channel().unwrap();
    assert_eq!(client.state(), ClientState::SessionRenewed);
    assert_eq!(server.state.borrow().token_id(), 2);
}

#[test]
fn publish_pump_keeps_the_target_outstanding() {
    let server = MockServer::new();
    let publishes: Rc<RefCell<Vec<(u32, opcua_types::PublishRequest)>>> =
        Rc::new(RefCell::new(Vec::new()));
    let stash = publishes.clone();
    server.set_handler(move |state, id, request| match request {
        RequestMessage::Publish(r) => {
            stash.borrow_mut().push((id, *r));
        }
        RequestMessage::CreateSubscription(r) => {
            let response = opcua_types::CreateSubscriptionResponse {
                response_header: good_header(r.request_header.request_handle),
                subscription_id: 7,
                revised_publishing_interval: r.requested_publishing_interval,
                revised_lifetime_count: r.requested_lifetime_count,
                revised_max_keep_alive_count: r.requested_max_keep_alive_count,
            };
            state.respond(id, response);
        }
        other => default_handler(state, id, other),
    });

    let mut client = server.client(
        ClientBuilder::new()
            .outstanding_publish_requests(2)
            .sync_timeout(Duration::from_secs(5)),
    );
    client.connect(ENDPOINT).unwrap();

    let notifications: Rc<RefCell<Vec<u32>>> = Rc::new(RefCell::new(Vec::new()));
    let seen = notifications.clone();
    client.set_notification_callback(Some(Box::new(move |subscription_id, message| {
        assert_eq!(subscription_id, 7);
        seen.borrow_mut().push(message.sequence_number);
    })));

    // Warm-up: the pump issued exactly the target.
    assert_eq!(client.outstanding_publish_requests(), 2);
    assert_eq!(publishes.borrow().len(), 2);

    client
        .create_subscription(opcua_types::CreateSubscriptionRequest {
            request_header: Default::default(),
            requested_publishing_interval: 100.0,
            requested_lifetime_count: 60,
            requested_max_keep_alive_count: 20,
            max_notifications_per_publish: 0,
            publishing_enabled: true,
            priority: 0,
        })
        .unwrap();

    // Serve the first publish with a notification; the pump tops back up.
    let (first_id, first_request) = publishes.borrow_mut().remove(0);
    {
        let mut state = server.state.borrow_mut();
        state.respond(
            first_id,
            PublishResponse {
                response_header: good_header(first_request.request_header.request_handle),
                subscription_id: 7,
                available_sequence_numbers: None,
                more_notifications: false,
                notification_message: NotificationMessage {
                    sequence_number: 1,
                    publish_time: opcua_types::DateTime::now(),
                    notification_data: Some(vec![opcua_types::ExtensionObject::from_message(
                        &opcua_types::DataChangeNotification {
                            monitored_items: Some(vec![opcua_types::MonitoredItemNotification {
                                client_handle: 1,
                                value: DataValue::new_now(Variant::Int32(5)),
                            }]),
                            diagnostic_infos: None,
                        },
                    )]),
                },
                results: None,
                diagnostic_infos: None,
            },
        );
    }
    client.run(Duration::from_millis(50));

    // Still exactly two outstanding: one original plus one replacement.
    assert_eq!(client.outstanding_publish_requests(), 2);
    assert_eq!(*notifications.borrow(), vec![1]);
    assert_eq!(publishes.borrow().len(), 2);

    // The replacement publish acknowledged the notification it replaced.
    let acks = publishes.borrow()[1]
        .1
        .subscription_acknowledgements
        .clone()
        .unwrap();
    assert_eq!(acks.len(), 1);
    assert_eq!(acks[0].subscription_id, 7);
    assert_eq!(acks[0].sequence_number, 1);

    // The server pushes back on one of them: the target drops to one for the
    // rest of the session.
    let (second_id, second_request) = publishes.borrow_mut().remove(0);
    {
        let mut state = server.state.borrow_mut();
        state.fault(
            second_id,
            second_request.request_header.request_handle,
            StatusCode::BadTooManyPublishRequests,
        );
    }
    client.run(Duration::from_millis(50));
    assert_eq!(client.outstanding_publish_requests(), 1);

    // Completing the remaining publish tops up to one, not two.
    let (third_id, third_request) = publishes.borrow_mut().remove(0);
    {
        let mut state = server.state.borrow_mut();
        state.respond(
            third_id,
            PublishResponse {
                response_header: good_header(third_request.request_header.request_handle),
                subscription_id: 7,
                available_sequence_numbers: None,
                more_notifications: false,
                notification_message: NotificationMessage {
                    sequence_number: 2,
                    publish_time: opcua_types::DateTime::now(),
                    notification_data: None,
                },
                results: None,
                diagnostic_infos: None,
            },
        );
    }
    client.run(Duration::from_millis(50));
    assert_eq!(client.outstanding_publish_requests(), 1);
}

#[test]
fn publish_pump_parks_without_a_subscription() {
    let server = MockServer::new();
    let publish_count = Rc::new(RefCell::new(0u32));
    let counter = publish_count.clone();
    server.set_handler(move |state, id, request| match request {
        RequestMessage::Publish(r) => {
            *counter.borrow_mut() += 1;
            state.fault(
                id,
                r.request_header.request_handle,
                StatusCode::BadNoSubscription,
            );
        }
        RequestMessage::CreateSubscription(r) => {
            let response = opcua_types::CreateSubscriptionResponse {
                response_header: good_header(r.request_header.request_handle),
                subscription_id: 1,
                revised_publishing_interval: 100.0,
                revised_lifetime_count: 60,
                revised_max_keep_alive_count: 20,
            };
            state.respond(id, response);
        }
        other => default_handler(state, id, other),
    });

    let mut client = server.client(ClientBuilder::new().outstanding_publish_requests(1));
    client.connect(ENDPOINT).unwrap();
    client.run(Duration::from_millis(50));

    // The pump parked after the server said there is nothing to publish for.
    assert_eq!(*publish_count.borrow(), 1);
    assert_eq!(client.outstanding_publish_requests(), 0);
    client.run(Duration::from_millis(50));
    assert_eq!(*publish_count.borrow(), 1);

    // Creating a subscription revives it.
    client
        .create_subscription(opcua_types::CreateSubscriptionRequest {
            request_header: Default::default(),
            requested_publishing_interval: 100.0,
            requested_lifetime_count: 60,
            requested_max_keep_alive_count: 20,
            max_notifications_per_publish: 0,
            publishing_enabled: true,
            priority: 0,
        })
        .unwrap();
    assert_eq!(client.outstanding_publish_requests(), 1);
    assert_eq!(*publish_count.borrow(), 2);
}

#[test]
fn sync_calls_work_from_inside_timer_callbacks() {
    let server = MockServer::new();
    server.set_handler(|state, id, request| match request {
        RequestMessage::Read(r) => {
            let response = opcua_types::ReadResponse {
                response_header: good_header(r.request_header.request_handle),
                results: Some(vec![DataValue::new_now(Variant::Int32(3))]),
                diagnostic_infos: None,
            };
            state.respond(id, response);
        }
        other => default_handler(state, id, other),
    });

    let mut client = server.client(ClientBuilder::new());
    client.connect(ENDPOINT).unwrap();

    let outcome: Rc<RefCell<Option<StatusCode>>> = Rc::new(RefCell::new(None));
    let seen = outcome.clone();
    let id = client
        .add_repeated_callback(Duration::from_millis(10), move |client| {
            let result = client.read(read_request(2258));
            *seen.borrow_mut() = Some(match result {
                Ok(_) => StatusCode::Good,
                Err(e) => e,
            });
        })
        .unwrap();

    let started = Instant::now();
    while outcome.borrow().is_none() && started.elapsed() < Duration::from_secs(1) {
        client.run(Duration::from_millis(10));
    }
    client.remove_repeated_callback(id).unwrap();
    assert_eq!(*outcome.borrow(), Some(StatusCode::Good));
}

#[test]
fn get_endpoints_over_a_transient_channel() {
    let server = MockServer::new();
    server.set_handler(|state, id, request| match request {
        RequestMessage::GetEndpoints(r) => {
            let response = opcua_types::GetEndpointsResponse {
                response_header: good_header(r.request_header.request_handle),
                endpoints: Some(vec![opcua_types::EndpointDescription::from(
                    "opc.tcp://127.0.0.1:4840",
                )]),
            };
            state.respond(id, response);
        }
        other => default_handler(state, id, other),
    });

    let mut client = server.client(ClientBuilder::new());
    let endpoints = client.get_endpoints(ENDPOINT).unwrap();
    assert_eq!(endpoints.len(), 1);
    // No session or channel remains on the client itself.
    assert_eq!(client.state(), ClientState::Disconnected);
    let state = server.state.borrow();
    assert!(!state
        .requests
        .iter()
        .any(|(_, r)| matches!(r, RequestMessage::CreateSession(_))));
}

#[test]
fn username_connect_uses_the_advertised_policy() {
    let server = MockServer::new();
    let seen_token: Rc<RefCell<Option<opcua_types::ExtensionObject>>> =
        Rc::new(RefCell::new(None));
    let stash = seen_token.clone();
    server.set_handler(move |state, id, request| match request {
        RequestMessage::GetEndpoints(r) => {
            let endpoint = opcua_types::EndpointDescription {
                user_identity_tokens: Some(vec![opcua_types::UserTokenPolicy {
                    policy_id: "user-pass-policy".into(),
                    token_type: opcua_types::UserTokenType::UserName,
                    issued_token_type: Default::default(),
                    issuer_endpoint_url: Default::default(),
                    security_policy_uri: Default::default(),
                }]),
                ..opcua_types::EndpointDescription::from("opc.tcp://127.0.0.1:4840")
            };
            let response = opcua_types::GetEndpointsResponse {
                response_header: good_header(r.request_header.request_handle),
                endpoints: Some(vec![endpoint]),
            };
            state.respond(id, response);
        }
        RequestMessage::ActivateSession(r) => {
            *stash.borrow_mut() = Some(r.user_identity_token.clone());
            default_handler(state, id, RequestMessage::ActivateSession(r));
        }
        other => default_handler(state, id, other),
    });

    let mut client = server.client(ClientBuilder::new());
    client.connect_username(ENDPOINT, "user", "secret").unwrap();
    assert_eq!(client.state(), ClientState::Session);

    let token = seen_token.borrow().clone().unwrap();
    let token: opcua_types::UserNameIdentityToken = token
        .decode_inner(&opcua_types::DecodingOptions::default())
        .unwrap();
    assert_eq!(token.policy_id.as_ref(), "user-pass-policy");
    assert_eq!(token.user_name.as_ref(), "user");
    assert_eq!(token.password.as_ref(), b"secret");
}

#[test]
fn process_binary_message_injects_bytes() {
    let server = MockServer::new();
    server.set_handler(|state, id, request| match request {
        RequestMessage::Read(_) => {
            // Swallow; the test hand-delivers the bytes instead.
            let _ = (state, id);
        }
        other => default_handler(state, id, other),
    });

    let mut client = server.client(ClientBuilder::new());
    client.connect(ENDPOINT).unwrap();

    let outcome: Rc<RefCell<Option<StatusCode>>> = Rc::new(RefCell::new(None));
    let seen = outcome.clone();
    let request_id = client
        .send_async(read_request(2258), move |_, _, response: opcua_types::ReadResponse| {
            *seen.borrow_mut() = Some(response.response_header.service_result);
        })
        .unwrap();

    // Build the response on the server side, then bypass the connection and
    // inject the raw bytes directly.
    let (handle, _) = {
        let state = server.state.borrow();
        let (_, request) = state
            .requests
            .iter()
            .find(|(_, r)| matches!(r, RequestMessage::Read(_)))
            .unwrap();
        (request.request_header().request_handle, ())
    };
    let bytes = {
        let mut state = server.state.borrow_mut();
        state.respond(
            request_id,
            opcua_types::ReadResponse {
                response_header: good_header(handle),
                results: Some(vec![DataValue::new_now(Variant::Int32(9))]),
                diagnostic_infos: None,
            },
        );
        state.take_queued()
    };
    for frame in bytes {
        client.process_binary_message(&frame);
    }
    client.run_iterate();
    assert_eq!(*outcome.borrow(), Some(StatusCode::Good));
}
