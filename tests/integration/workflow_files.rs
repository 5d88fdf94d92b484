use refchain::context::{DirectoryContext, WorkflowContext};
use refchain::workflow::{WorkflowDefinition, WorkflowRunner};
use serde_json::json;
use tempfile::TempDir;

const PIPELINE: &str = r#"
name: invoice
steps:
  - command: load
    path: invoice.txt
    token: invoice
  - command: extract
    input: invoice
    pattern: 'Total: \$([0-9.]+)'
    output: total
  - command: shell
    script: "printf 'amount=%s' {{total}}"
    output: line
  - command: regex_match
    input: invoice
    pattern: '(\w+) x(\d+)'
    output: items
"#;

#[tokio::test]
async fn pipeline_runs_end_to_end_in_directory_context() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("invoice.txt"),
        "apple x2\npear x5\nTotal: $7.50\n",
    )
    .unwrap();
    let workflow_path = temp.path().join("invoice.yaml");
    std::fs::write(&workflow_path, PIPELINE).unwrap();
    let out = temp.path().join("out");

    let definition = WorkflowDefinition::from_file(&workflow_path).unwrap();
    let mut ctx = DirectoryContext::new(&out);
    let report = WorkflowRunner::run(&mut ctx, &definition, None)
        .await
        .unwrap();

    assert_eq!(report.steps.len(), 4);
    assert_eq!(ctx.token("total"), Some(&json!("7.50")));
    assert_eq!(ctx.token("line"), Some(&json!("amount=7.50")));
    assert_eq!(
        ctx.token("items"),
        Some(&json!(
            "1. apple x2 (groups: apple, 2)\n2. pear x5 (groups: pear, 5)"
        ))
    );
    // load registers without copying; the three derived refs are written.
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 3);
}
