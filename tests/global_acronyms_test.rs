//! Process-wide acronym table replacement.
//!
//! Kept in its own test binary: installing a table affects every check in
//! the process that relies on the global table.

mod common;

use common::{docx, para, LETTER_SECT_PR};
use docqc::acronym::{self, AcronymEntry, AcronymTable};
use docqc::DocQc;

#[test]
fn test_install_replaces_global_snapshot() {
    let before = acronym::global();
    let custom = AcronymTable::new()
        .with_entry("QCX", AcronymEntry::new("Quality Control Extended", "Custom"))
        .unwrap();
    acronym::install(custom);
    assert!(acronym::global().has_definition("QCX"));
    assert_eq!(acronym::global().len(), 1);

    // Snapshots taken earlier are unaffected.
    assert!(before.len() > 1);
    assert!(!before.has_definition("QCX"));

    // Checks without an explicit table read the installed one.
    let data = docx(&format!("{}{}", para("Ship the QCX build."), LETTER_SECT_PR));
    let report = DocQc::new().check_bytes(&data).unwrap();
    assert!(report.results_for(12).next().unwrap().passed);

    acronym::install(AcronymTable::builtin());
    assert!(acronym::global().has_definition("API"));
}
