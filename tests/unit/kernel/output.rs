use super::*;

#[test]
fn errors_raise_toasts_and_other_levels_do_not() {
    let mut output = OutputState::new();
    output.info("Opened main.c");
    output.success("Saved main.c");
    output.error("Save failed: denied");

    assert_eq!(output.history().count(), 3);
    assert_eq!(output.message().unwrap().text, "Save failed: denied");
    let toasts = output.take_toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, OutputLevel::Error);
    assert_eq!(output.toasts().count(), 0);
}

#[test]
fn history_and_toasts_are_bounded() {
    let mut output = OutputState::new();
    for i in 0..(MAX_HISTORY + 10) {
        output.error(format!("e{}", i));
    }
    assert_eq!(output.history().count(), MAX_HISTORY);
    assert_eq!(output.toasts().count(), MAX_TOASTS);
    assert_eq!(output.history().next().unwrap().text, "e10");
}

#[test]
fn replace_and_clear() {
    let mut output = OutputState::new();
    output.info("a");
    output.replace(OutputLevel::Success, "build ok\n");
    assert_eq!(output.history().count(), 1);
    assert!(output.clear());
    assert!(output.message().is_none());
    assert!(!output.clear());
}

#[test]
fn since_yields_only_lines_after_the_mark() {
    let mut output = OutputState::new();
    output.info("before");
    let mark = output.mark();
    output.info("one");
    output.error("two");

    let fresh: Vec<_> = output.since(mark).map(|l| l.text.as_str()).collect();
    assert_eq!(fresh, vec!["one", "two"]);

    output.replace(OutputLevel::Success, "build ok");
    let fresh: Vec<_> = output.since(mark).map(|l| l.text.as_str()).collect();
    assert_eq!(fresh, vec!["build ok"]);
}
