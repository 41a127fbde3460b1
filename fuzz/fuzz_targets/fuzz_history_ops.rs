#![no_main]

use arbitrary::Arbitrary;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use libfuzzer_sys::fuzz_target;
use tempo_core::{CalendarEvent, TimeSpan};
use tempo_history::{Command, CommandSeq, HistoryConfig, HistoryManager};

#[derive(Debug, Arbitrary)]
enum Op {
    Create { start: u16, len: u8 },
    Update { pick: u8, title: u8 },
    Delete { pick: u8 },
    Move { pick: u8, start: u16, len: u8 },
    Resize { pick: u8, len: u8 },
    Batch { picks: Vec<u8> },
    Undo,
    Redo,
    Clear,
}

#[derive(Debug, Arbitrary)]
struct Input {
    bound: u8,
    ops: Vec<Op>,
}

fn minutes(m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 6)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t + Duration::minutes(i64::from(m)))
        .unwrap()
}

fn pick(state: &[CalendarEvent], i: u8) -> Option<&CalendarEvent> {
    (!state.is_empty()).then(|| &state[usize::from(i) % state.len()])
}

fuzz_target!(|input: Input| {
    // Cap length to keep fuzzing fast.
    if input.ops.len() > 256 {
        return;
    }
    let bound = usize::from(input.bound % 16).max(1);
    let mut mgr = HistoryManager::new(HistoryConfig::new(bound));
    let mut state: Vec<CalendarEvent> = Vec::new();
    let mut fresh = 0u32;

    for op in input.ops {
        let cmd = match op {
            Op::Create { start, len } => {
                fresh += 1;
                let s = u32::from(start);
                Some(Command::create(&CalendarEvent::new(
                    format!("e{fresh}"),
                    "Fuzz",
                    minutes(s),
                    minutes(s + u32::from(len)),
                )))
            }
            Op::Update { pick: i, title } => pick(&state, i).map(|before| {
                let mut after = before.clone();
                after.title = format!("t{title}");
                Command::update(before, &after)
            }),
            Op::Delete { pick: i } => pick(&state, i).map(Command::delete),
            Op::Move { pick: i, start, len } => pick(&state, i).map(|e| {
                let s = u32::from(start);
                Command::move_entity(e, TimeSpan::new(minutes(s), minutes(s + u32::from(len))))
            }),
            Op::Resize { pick: i, len } => pick(&state, i)
                .map(|e| Command::resize_entity(e, e.start + Duration::minutes(i64::from(len)))),
            Op::Batch { picks } => {
                let mut scratch = state.clone();
                let mut commands = Vec::new();
                for i in picks.into_iter().take(8) {
                    if let Some(e) = pick(&scratch, i) {
                        let cmd = Command::resize_entity(e, e.end + Duration::minutes(15));
                        scratch = cmd.execute(&scratch);
                        commands.push(cmd);
                    }
                }
                CommandSeq::try_from(commands)
                    .ok()
                    .map(|seq| Command::batch("Fuzz batch", seq))
            }
            Op::Undo => {
                let before = (mgr.undo_depth(), mgr.redo_depth());
                match mgr.undo(&state).map(|applied| applied.state) {
                    Some(next) => state = next,
                    None => assert_eq!(before, (0, mgr.redo_depth())),
                }
                None
            }
            Op::Redo => {
                let before = (mgr.undo_depth(), mgr.redo_depth());
                match mgr.redo(&state).map(|applied| applied.state) {
                    Some(next) => state = next,
                    None => assert_eq!(before, (mgr.undo_depth(), 0)),
                }
                None
            }
            Op::Clear => {
                mgr.clear();
                assert!(!mgr.can_undo() && !mgr.can_redo());
                None
            }
        };

        if let Some(cmd) = cmd {
            // Round-trip must hold for every command built from live state.
            let forward = cmd.execute(&state);
            let mut back = cmd.undo(&forward);
            let mut expected = state.clone();
            back.sort_by(|a, b| a.id.cmp(&b.id));
            expected.sort_by(|a, b| a.id.cmp(&b.id));
            assert_eq!(back, expected, "round-trip failed for {}", cmd.description());

            state = mgr.execute(cmd, &state);
            assert!(!mgr.can_redo(), "execute must clear redo");
        }

        assert!(mgr.undo_depth() <= bound, "undo stack exceeded bound");
    }
});
