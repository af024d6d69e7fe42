//! `validate` and `plan` commands.

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_stamp_core::{
    AssetPool, DigestAlgorithm, DocumentSource, NormalizedTask, RenderOp, StampAsset, Task,
    payload_sri, to_render_instructions, validate_assets_with, validate_task_with,
};
use std::collections::HashMap;
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use crate::cli::TaskInputs;
use crate::json::{PlanJson, RenderOpJson, ValidateJson};
use crate::util::{format_bytes, read_json};

struct Checked {
    assets: Vec<StampAsset>,
    normalized: NormalizedTask,
}

fn new_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn describe_source(source: &DocumentSource) -> String {
    match source {
        DocumentSource::Path(p) => p.display().to_string(),
        DocumentSource::Bytes(b) => format!("<in-memory PDF, {}>", format_bytes(b.len())),
    }
}

/// Load both inputs and run asset and task validation.
fn load_and_check(inputs: &TaskInputs) -> Result<Checked> {
    let config = inputs.config();
    tracing::debug!(?config, "Validation config");

    let spinner = new_spinner();
    spinner.set_message(format!(
        "Reading asset pool {}",
        style(inputs.assets.display()).cyan()
    ));
    let assets: Vec<StampAsset> = read_json(&inputs.assets, "asset pool")?;
    let payload_total: usize = assets.iter().map(|a| a.image.len()).sum();
    spinner.finish_with_message(format!(
        "[OK] Read {} stamp asset(s) ({})",
        style(assets.len()).cyan(),
        style(format_bytes(payload_total)).cyan()
    ));

    let spinner = new_spinner();
    spinner.set_message(format!("Reading task {}", style(inputs.task.display()).cyan()));
    let task: Task = read_json(&inputs.task, "task")?;
    spinner.finish_with_message(format!(
        "[OK] Read task ({} page assignment(s))",
        style(task.pages.len()).cyan()
    ));

    let asset_ids = validate_assets_with(&assets, &config).context("Asset pool is invalid")?;
    let normalized =
        validate_task_with(&task, &asset_ids, &config).context("Signing task is invalid")?;

    for warning in &normalized.warnings {
        eprintln!(
            "{} {}",
            style("Warning:").yellow().bold(),
            style(warning).dim()
        );
    }

    Ok(Checked { assets, normalized })
}

/// Machine-readable summary of a validated task.
fn validate_json<'a>(task_path: &Path, checked: &'a Checked) -> ValidateJson<'a> {
    ValidateJson {
        status: "ok",
        command: "validate",
        task: task_path.display().to_string(),
        source: describe_source(&checked.normalized.source),
        assets: checked.assets.len(),
        pages: checked.normalized.pages.len(),
        placements: checked.normalized.placement_count(),
        warnings: &checked.normalized.warnings,
    }
}

/// Render instructions as output rows, digesting each distinct asset once.
fn plan_rows(ops: &[RenderOp<'_>], digest_alg: DigestAlgorithm) -> Vec<RenderOpJson> {
    let mut sri_by_id: HashMap<&str, String> = HashMap::new();
    ops.iter()
        .map(|op| {
            let sri = sri_by_id
                .entry(op.asset.id.as_str())
                .or_insert_with(|| payload_sri(digest_alg, &op.asset.image))
                .clone();
            RenderOpJson::new(op, sri)
        })
        .collect()
}

fn plan_json<'a>(
    task_path: &Path,
    checked: &'a Checked,
    digest_alg: DigestAlgorithm,
) -> Result<PlanJson<'a>> {
    let pool = AssetPool::new(&checked.assets);
    let ops = to_render_instructions(&checked.normalized, &pool)
        .context("Asset pool does not match the validated task")?;
    Ok(PlanJson {
        status: "ok",
        command: "plan",
        task: task_path.display().to_string(),
        source: describe_source(&checked.normalized.source),
        digest_algorithm: digest_alg.name(),
        ops: plan_rows(&ops, digest_alg),
        warnings: &checked.normalized.warnings,
    })
}

pub fn validate(inputs: TaskInputs, json: bool) -> Result<()> {
    eprintln!("{}", style("==> Validating signing task").cyan().bold());

    let checked = load_and_check(&inputs)?;
    let payload = validate_json(&inputs.task, &checked);

    eprintln!(
        "\n{} {}",
        style("[VALID]").green().bold(),
        style(format!(
            "{} placement(s) on {} page(s)",
            payload.placements, payload.pages
        ))
        .green()
    );
    eprintln!("    Source: {}", style(&payload.source).cyan());

    if json {
        println!("{}", serde_json::to_string(&payload)?);
    } else if !std::io::stdout().is_terminal() {
        // Only print "OK" when stdout is piped (for pipeline composition)
        println!("OK");
    }

    Ok(())
}

pub fn plan(inputs: TaskInputs, digest_algorithm: String, json: bool) -> Result<()> {
    eprintln!("{}", style("==> Building render plan").cyan().bold());

    let digest_alg = DigestAlgorithm::from_name(&digest_algorithm)?;
    let checked = load_and_check(&inputs)?;
    let payload = plan_json(&inputs.task, &checked, digest_alg)?;

    eprintln!(
        "\n{} {}",
        style("[SUCCESS]").green().bold(),
        style(format!("{} render instruction(s)", payload.ops.len())).cyan()
    );

    if json {
        println!("{}", serde_json::to_string(&payload)?);
    } else {
        for (i, row) in payload.ops.iter().enumerate() {
            println!(
                "{:>4}  page {:<4} {:<20} x={:.2} y={:.2} scale={} rot={} size={:.2}x{:.2}pt",
                i + 1,
                row.page_index,
                row.stamp_id,
                row.x,
                row.y,
                row.scale,
                row.rotation_degrees,
                row.width_pt,
                row.height_pt
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    const POOL: &str = r#"[
        { "id": "sig", "type": "SIGNATURE", "name": "Jane", "base64": "aGVsbG8=",
          "width": 40, "height": 15, "createAt": 1 },
        { "id": "seal", "type": "SEAL", "name": "ACME", "base64": "data:image/png;base64,iVBORw0KGgo=",
          "width": 30, "height": 30, "cert": { "handle": 7 }, "createAt": 2 }
    ]"#;

    fn inputs(dir: &tempfile::TempDir, task: &str, page_count: Option<u32>) -> TaskInputs {
        TaskInputs {
            task: write_file(dir, "task.json", task),
            assets: write_file(dir, "pool.json", POOL),
            page_count,
            max_payload_bytes: pdf_stamp_core::DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }

    #[test]
    fn checks_valid_task() {
        let dir = tempfile::tempdir().unwrap();
        let task = r#"{ "pdfPath": "contract.pdf", "pages": [
            { "pageIndex": 0, "signs": [
                { "stampId": "sig", "x": 72, "y": 72, "scale": 1, "rotation": 0 },
                { "stampId": "seal", "x": -5, "y": 72, "scale": 0.5, "rotation": -45 }
            ]}
        ]}"#;
        let checked = load_and_check(&inputs(&dir, task, Some(1))).unwrap();
        assert_eq!(checked.assets.len(), 2);
        assert_eq!(checked.normalized.placement_count(), 2);
        assert_eq!(checked.normalized.pages[0].placements[1].rotation, 315.0);
        assert_eq!(checked.normalized.warnings.len(), 1);
    }

    #[test]
    fn invalid_task_error_keeps_cause() {
        let dir = tempfile::tempdir().unwrap();
        let task = r#"{ "pdfPath": "contract.pdf", "pages": [
            { "pageIndex": 3, "signs": [
                { "stampId": "ghost", "x": 0, "y": 0, "scale": 1, "rotation": 0 }
            ]}
        ]}"#;
        let err = match load_and_check(&inputs(&dir, task, None)) {
            Ok(_) => panic!("Expected validation failure"),
            Err(e) => e,
        };
        assert_eq!(err.to_string(), "Signing task is invalid");
        let cause = err.chain().nth(1).unwrap().to_string();
        assert_eq!(cause, "stamp 'ghost' referenced on page 3 does not exist");
    }

    #[test]
    fn page_count_flag_is_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let task = r#"{ "pdfBytes": "JVBERi0=", "pages": [ { "pageIndex": 2, "signs": [] } ] }"#;
        assert!(load_and_check(&inputs(&dir, task, Some(2))).is_err());
        assert!(load_and_check(&inputs(&dir, task, Some(3))).is_ok());
    }

    #[test]
    fn in_memory_source_is_summarized() {
        let source = DocumentSource::Bytes(vec![0; 2048]);
        assert_eq!(describe_source(&source), "<in-memory PDF, 2.0 KB>");
    }

    const TWO_PAGE_TASK: &str = r#"{ "pdfPath": "contract.pdf", "pages": [
        { "pageIndex": 1, "signs": [
            { "stampId": "seal", "x": 10, "y": 20, "scale": 1, "rotation": -90 },
            { "stampId": "sig", "x": -4, "y": 20, "scale": 2, "rotation": 450 }
        ]},
        { "pageIndex": 0, "signs": [
            { "stampId": "seal", "x": 30, "y": 40, "scale": 1, "rotation": 0 }
        ]}
    ]}"#;

    #[test]
    fn plan_json_keeps_paint_order_and_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = inputs(&dir, TWO_PAGE_TASK, None);
        let checked = load_and_check(&inputs).unwrap();
        let payload = plan_json(&inputs.task, &checked, DigestAlgorithm::Sha512).unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["status"], "ok");
        assert_eq!(value["command"], "plan");
        assert_eq!(value["digest_algorithm"], "sha512");

        let ops = value["ops"].as_array().unwrap();
        assert_eq!(ops.len(), 3);
        let order: Vec<(u64, &str, f64)> = ops
            .iter()
            .map(|op| {
                (
                    op["page_index"].as_u64().unwrap(),
                    op["stamp_id"].as_str().unwrap(),
                    op["rotation_degrees"].as_f64().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            order,
            vec![(1, "seal", 270.0), (1, "sig", 90.0), (0, "seal", 0.0)]
        );

        let first = ops[0].as_object().unwrap();
        for key in [
            "page_index",
            "stamp_id",
            "asset_sri",
            "x",
            "y",
            "scale",
            "rotation_degrees",
            "width_pt",
            "height_pt",
        ] {
            assert!(first.contains_key(key), "missing key {key}");
        }
        // 30 mm at scale 1
        assert!((ops[0]["width_pt"].as_f64().unwrap() - 30.0 * 72.0 / 25.4).abs() < 1e-9);
    }

    #[test]
    fn same_asset_shares_one_sri() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = inputs(&dir, TWO_PAGE_TASK, None);
        let checked = load_and_check(&inputs).unwrap();
        let payload = plan_json(&inputs.task, &checked, DigestAlgorithm::Sha256).unwrap();

        let seal_sri = &payload.ops[0].asset_sri;
        assert!(seal_sri.starts_with("sha256-"));
        assert_eq!(seal_sri, &payload.ops[2].asset_sri);
        assert_ne!(seal_sri, &payload.ops[1].asset_sri);
        assert_eq!(
            payload.ops[1].asset_sri,
            payload_sri(DigestAlgorithm::Sha256, b"hello")
        );
    }

    #[test]
    fn off_page_warning_is_tagged() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = inputs(&dir, TWO_PAGE_TASK, None);
        let checked = load_and_check(&inputs).unwrap();
        let payload = plan_json(&inputs.task, &checked, DigestAlgorithm::Sha512).unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value["warnings"],
            serde_json::json!([
                { "kind": "off_page", "page_index": 1, "stamp_id": "sig", "x": -4.0, "y": 20.0 }
            ])
        );
    }

    #[test]
    fn validate_json_summarizes_task() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = inputs(&dir, TWO_PAGE_TASK, Some(2));
        let checked = load_and_check(&inputs).unwrap();
        let value = serde_json::to_value(validate_json(&inputs.task, &checked)).unwrap();

        assert_eq!(value["status"], "ok");
        assert_eq!(value["command"], "validate");
        assert_eq!(value["source"], "contract.pdf");
        assert_eq!(value["assets"], 2);
        assert_eq!(value["pages"], 2);
        assert_eq!(value["placements"], 3);
        assert_eq!(value["warnings"][0]["kind"], "off_page");
    }
}
