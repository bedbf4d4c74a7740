use std::thread;

use logging::{Emit, Record, Severity};
use logging_sink::{Destination, Outputs};
use proptest::prelude::*;
use routing::{EnvOverrides, Router, RouterOptions};

const STREAMS: [&str; 4] = ["app", "remote", "db", "other"];
const SEVERITIES: [u8; 7] = [5, 10, 15, 20, 25, 30, 40];

fn memory_router() -> (Router, Outputs) {
    let outputs = Outputs {
        out: Destination::memory(),
        err: Destination::memory(),
    };
    let router = Router::builder(EnvOverrides::default())
        .outputs(outputs.clone())
        .terminal_probe(|_| false)
        .build();
    (router, outputs)
}

fn options() -> RouterOptions {
    RouterOptions {
        enabled: Some(vec!["app".into(), "remote".into(), "db:info".into()]),
        ..RouterOptions::default()
    }
}

/// Where a record should land under [`options`], and how it is rendered.
fn expected_line(stream: &str, severity: u8, message: &str) -> Option<(bool, String)> {
    match stream {
        "app" if severity <= Severity::INFO.value() => Some((true, format!("{message}\n"))),
        "app" if severity >= Severity::WARNING.value() => Some((false, format!("{message}\n"))),
        "remote" | "db" if severity >= Severity::INFO.value() => {
            Some((false, format!("{stream}: {message}\n")))
        }
        _ => None,
    }
}

fn record_strategy() -> impl Strategy<Value = (usize, usize)> {
    (0..STREAMS.len(), 0..SEVERITIES.len())
}

proptest! {
    #[test]
    fn replay_and_live_delivery_match_emission_order(
        early in proptest::collection::vec(record_strategy(), 0..40),
        late in proptest::collection::vec(record_strategy(), 0..20),
    ) {
        let (router, outputs) = memory_router();
        let mut expected_out = String::new();
        let mut expected_err = String::new();

        let mut emit_all = |records: &[(usize, usize)], tag: &str| {
            for (index, (stream, severity)) in records.iter().enumerate() {
                let stream = STREAMS[*stream];
                let severity = SEVERITIES[*severity];
                let message = format!("{tag}{index}");
                router.emit(Record::new(stream, Severity::new(severity), message.clone()));
                if let Some((to_out, line)) = expected_line(stream, severity, &message) {
                    if to_out {
                        expected_out.push_str(&line);
                    } else {
                        expected_err.push_str(&line);
                    }
                }
            }
        };

        emit_all(&early, "e");
        prop_assert_eq!(outputs.out.contents().unwrap(), "");
        prop_assert_eq!(outputs.err.contents().unwrap(), "");

        router.finalize(&options()).unwrap();
        prop_assert_eq!(router.pending_records(), 0);
        emit_all(&late, "l");

        prop_assert_eq!(outputs.out.contents().unwrap(), expected_out);
        prop_assert_eq!(outputs.err.contents().unwrap(), expected_err);
    }
}

#[test]
fn concurrent_emitters_never_overtake_replay() {
    let (router, outputs) = memory_router();
    let app = router.logger("app");
    for index in 0..10 {
        app.info(format!("early{index}"));
    }

    let late = router.logger("app");
    let emitter = thread::spawn(move || {
        for index in 0..200 {
            late.info(format!("late{index}"));
        }
    });
    router.finalize(&RouterOptions::default()).unwrap();
    emitter.join().unwrap();

    let expected: String = (0..10)
        .map(|index| format!("early{index}\n"))
        .chain((0..200).map(|index| format!("late{index}\n")))
        .collect();
    assert_eq!(outputs.out.contents().unwrap(), expected);
}
