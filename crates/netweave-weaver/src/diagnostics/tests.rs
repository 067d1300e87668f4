use super::*;

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::SyncVarStatic, Location::member("Player", "score"))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    insta::assert_snapshot!(diagnostics.render(), @r"
    error: [SyncVar] field cannot be static
      --> Player::score
    ");
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::HookNotFound, Location::member("Player", "health"))
        .message("OnHealth")
        .hint("declare `void OnHealth(int value)`")
        .emit();

    insta::assert_snapshot!(diagnostics.render(), @r"
    error: hook method `OnHealth` not found
      --> Player::health
      = hint: declare `void OnHealth(int value)`
    ");
}

#[test]
fn default_hint_precedes_custom_hints() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::DirtyBitBudget, Location::member("Boss", "phase"))
        .hint("move state into a child behaviour")
        .emit();

    insta::assert_snapshot!(diagnostics.render(), @r"
    error: too many synchronized members
      --> Boss::phase
      = hint: at most 32 synchronized members per inheritance chain
      = hint: move state into a child behaviour
    ");
}

#[test]
fn warnings_do_not_count_as_errors() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::SyncListAsSyncVar, Location::member("Bag", "items"))
        .emit();

    assert!(!diagnostics.has_errors());
    assert!(diagnostics.has_warnings());
    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(diagnostics.error_count(), 0);
}

#[test]
fn extend_keeps_order() {
    let mut a = Diagnostics::new();
    a.report(DiagnosticKind::RemoteStatic, Location::ty("A")).emit();
    let mut b = Diagnostics::new();
    b.report(DiagnosticKind::RemoteNotVoid, Location::ty("B")).emit();
    a.extend(b);

    assert_eq!(
        a.kinds(),
        [DiagnosticKind::RemoteStatic, DiagnosticKind::RemoteNotVoid]
    );
}

#[test]
fn colored_render_wraps_severity() {
    let diagnostics: Diagnostics =
        Diagnostic::new(DiagnosticKind::RemoteStatic, Location::member("A", "CmdGo")).into();
    let out = diagnostics.render_colored(true);
    assert!(out.starts_with("\x1b[31merror\x1b[0m: "));
}
