//! Unit tests for the architecture lint.

use std::path::PathBuf;

use rstest::{fixture, rstest};

use super::*;

const DOMAIN: (&str, &str) = ("domain/mod.rs", "pub struct User;");
const REPOSITORY: (&str, &str) = (
    "repository/mod.rs",
    "use crate::domain::User; pub trait UserRepository {}",
);
const SERVICE: (&str, &str) = (
    "service/mod.rs",
    "use crate::repository::UserRepository; use crate::domain::User; pub struct DefaultUserService;",
);
const CONTROLLER: (&str, &str) = (
    "controller/mod.rs",
    "use crate::service::DefaultUserService; pub struct UserController;",
);
const ROOT: (&str, &str) = (
    "lib.rs",
    "use crate::repository::UserRepository; use crate::controller::UserController;",
);

#[derive(Clone, Copy)]
struct LintWith;

impl LintWith {
    fn lint(self, extra: &[(&str, &str)]) -> Vec<Violation> {
        let sources = [DOMAIN, REPOSITORY, SERVICE, CONTROLLER, ROOT]
            .iter()
            .filter(|(file, _)| !extra.iter().any(|(other, _)| other == file))
            .chain(extra)
            .map(|(file, contents)| LintSource {
                file: PathBuf::from(file),
                contents: (*contents).to_owned(),
            })
            .collect::<Vec<_>>();
        match lint_sources(&sources, Some("app_lib"), &layered_service_rules()) {
            Ok(()) => Vec::new(),
            Err(ArchitectureLintError::Violations(violations)) => violations,
            Err(other) => panic!("unexpected lint failure: {other}"),
        }
    }
}

#[fixture]
fn lint_with() -> LintWith {
    LintWith
}

#[rstest]
fn conforming_layers_pass(lint_with: LintWith) {
    assert_eq!(lint_with.lint(&[]), Vec::new());
}

#[rstest]
#[case(
    "service/mod.rs",
    "use crate::controller::UserController; pub struct DefaultUserService;",
    "no module in `service` should depend on `controller`"
)]
#[case(
    "repository/mod.rs",
    "use super::controller::UserController; pub trait UserRepository {}",
    "no module in `repository` should depend on `controller`"
)]
#[case(
    "controller/mod.rs",
    "use app_lib::repository::UserRepository; pub struct UserController;",
    "`repository` should only be accessed by `service`"
)]
#[case(
    "domain/mod.rs",
    "use crate::service::DefaultUserService; pub struct User;",
    "layered architecture"
)]
#[case(
    "controller/mod.rs",
    "use crate::service::DefaultUserService; pub struct UserController; pub struct CreateUserRequest;",
    "types in `controller` should have names ending with `Controller`"
)]
#[case(
    "repository/mod.rs",
    "use crate::domain::User; pub trait UserRepository {} struct Row;",
    "types in `repository` should have names ending with `Repository`"
)]
#[case(
    "service/mod.rs",
    "use crate::repository::UserRepository; pub enum Outcome { Done }",
    "types in `service` should have names ending with `Service`"
)]
fn detects_rule_violations(
    lint_with: LintWith,
    #[case] file: &str,
    #[case] contents: &str,
    #[case] expected_rule: &str,
) {
    let violations = lint_with.lint(&[(file, contents)]);
    assert!(
        violations
            .iter()
            .any(|violation| violation.rule.starts_with(expected_rule)
                && violation.file == PathBuf::from(file)),
        "expected `{expected_rule}` in {violations:?}"
    );
}

#[rstest]
fn unlayered_module_may_not_reach_into_service(lint_with: LintWith) {
    let violations = lint_with.lint(&[(
        "config.rs",
        "use crate::service::DefaultUserService; pub struct Settings;",
    )]);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].file, PathBuf::from("config.rs"));
    assert!(violations[0].message.contains("layer Service"));
}

#[rstest]
fn crate_root_is_exempt(lint_with: LintWith) {
    let violations = lint_with.lint(&[(
        "main.rs",
        "use app_lib::controller::UserController; use app_lib::repository::UserRepository;",
    )]);
    assert!(violations.is_empty(), "{violations:?}");
}

#[rstest]
fn test_modules_are_ignored(lint_with: LintWith) {
    let violations = lint_with.lint(&[(
        "service/mod.rs",
        "use crate::repository::UserRepository; pub struct DefaultUserService; \
         #[cfg(test)] mod tests { use crate::controller::UserController; struct Fixture; }",
    )]);
    assert!(violations.is_empty(), "{violations:?}");
}

#[rstest]
fn out_of_line_test_module_is_ignored(lint_with: LintWith) {
    let violations = lint_with.lint(&[
        (
            "service/mod.rs",
            "use crate::repository::UserRepository; pub struct DefaultUserService; \
             #[cfg(test)] mod tests;",
        ),
        (
            "service/tests.rs",
            "use crate::controller::UserController; struct Fixture;",
        ),
    ]);
    assert!(violations.is_empty(), "{violations:?}");
}

#[test]
fn reports_every_distinct_cycle() {
    let sources = [
        ("a/mod.rs", "use crate::b::B; use crate::c::C; pub struct A;"),
        ("b/mod.rs", "use crate::a::A; pub struct B;"),
        ("c/mod.rs", "use crate::b::B; pub struct C;"),
    ]
    .iter()
    .map(|(file, contents)| LintSource {
        file: PathBuf::from(file),
        contents: (*contents).to_owned(),
    })
    .collect::<Vec<_>>();

    let graph = ModuleGraph::from_sources(&sources, None).unwrap();
    let messages = ArchRule::free_of_cycles()
        .evaluate(&graph)
        .into_iter()
        .map(|violation| violation.message)
        .collect::<Vec<_>>();
    assert_eq!(
        messages,
        vec![
            "cycle detected: a -> b -> a",
            "cycle detected: a -> c -> b -> a",
        ]
    );
}

#[test]
fn reports_each_cycle_once() {
    let sources = [
        ("alpha/mod.rs", "use crate::beta::B; pub struct A;"),
        ("beta/mod.rs", "use crate::gamma::C; pub struct B;"),
        ("gamma/mod.rs", "use crate::alpha::A; pub struct C;"),
        ("delta/mod.rs", "use crate::alpha::A; pub struct D;"),
    ]
    .iter()
    .map(|(file, contents)| LintSource {
        file: PathBuf::from(file),
        contents: (*contents).to_owned(),
    })
    .collect::<Vec<_>>();

    let result = lint_sources(&sources, None, &[ArchRule::free_of_cycles()]);
    let Err(ArchitectureLintError::Violations(violations)) = result else {
        panic!("expected a cycle violation, got {result:?}");
    };
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].message,
        "cycle detected: alpha -> beta -> gamma -> alpha"
    );
    assert_eq!(violations[0].file, PathBuf::from("alpha/mod.rs"));
}

#[test]
fn two_module_cycle_is_detected() {
    let sources = [
        ("service/mod.rs", "use crate::repository::UserRepository;"),
        ("repository/mod.rs", "use crate::service::DefaultUserService;"),
    ]
    .iter()
    .map(|(file, contents)| LintSource {
        file: PathBuf::from(file),
        contents: (*contents).to_owned(),
    })
    .collect::<Vec<_>>();

    let graph = ModuleGraph::from_sources(&sources, None).unwrap();
    let violations = ArchRule::free_of_cycles().evaluate(&graph);
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].message,
        "cycle detected: repository -> service -> repository"
    );
}

#[test]
fn parse_errors_name_the_file() {
    let sources = [LintSource {
        file: PathBuf::from("service/mod.rs"),
        contents: "pub struct".to_owned(),
    }];
    let err = lint_sources(&sources, None, &layered_service_rules()).unwrap_err();
    assert!(matches!(err, ArchitectureLintError::Parse { ref file, .. } if file == &PathBuf::from("service/mod.rs")));
}

#[test]
fn rule_description_includes_rationale() {
    let rule = ArchRule::no_dependency("service", "controller").because("layers point downwards");
    assert_eq!(
        rule.description(),
        "no module in `service` should depend on `controller`, because layers point downwards"
    );
}

#[test]
fn violations_render_grouped_by_rule() {
    let err = ArchitectureLintError::Violations(vec![
        Violation {
            rule: "rule one".to_owned(),
            file: PathBuf::from("a.rs"),
            message: "first".to_owned(),
        },
        Violation {
            rule: "rule one".to_owned(),
            file: PathBuf::from("b.rs"),
            message: "second".to_owned(),
        },
    ]);
    assert_eq!(
        err.to_string(),
        "Architecture rule violations:\nRule: rule one\n- a.rs: first\n- b.rs: second\n"
    );
}
