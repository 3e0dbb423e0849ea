//! Tests for patch execution against a project tree on disk
//!
//! These tests verify:
//! - Each built-in script edits its target under the project root
//! - Dry-run mode leaves files untouched
//! - Error paths (missing file, bad encoding) never write
//! - Strict mode and JSON plans

use std::fs;
use std::path::{Path, PathBuf};

use kkm_patch::{
    run_patch, CampbarFinal, CampbarTypes, MarketplaceBanner, PatchError, PatchPlan,
    PatchScript, PlanRule, RunOptions,
};
use tempfile::TempDir;

const CAMPBAR_ROUTES: &str = "server/src/routes/campbarRoutes.ts";
const MARKETPLACE_PAGE: &str = "client/src/pages/MarketplacePage.tsx";

/// Write `content` to `rel` under a fresh project root.
fn project_with(rel: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    fs::write(&path, content).expect("write fixture");
    (dir, path)
}

const ROUTES: &str = r#"router.post('/trips/:id/join', requireAuth, async (req, res) => {
    const { id } = req.params;
    const trip = await db.select().from(tripBoards).where(eq(tripBoards.id, id));
    if (trip[0].currentParticipants >= trip[0].maxParticipants) {
        return res.status(400).json({ error: 'Trip is full' });
    }
    await db.insert(tripParticipants).values({
        tripId: id,
        userId: req.user.id,
        status: 'joined',
    });
});

router.post('/trips/:id/dates/:dateOptionId/vote', requireAuth, async (req, res) => {
    const { dateOptionId } = req.params;
    const existing = await db.select().from(tripDateUserVotes)
        .where(and(eq(tripDateUserVotes.dateOptionId, dateOptionId), eq(tripDateUserVotes.userId, req.user.id)));
    await db.insert(tripDateUserVotes).values({
        userId: req.user.id,
        dateOptionId: dateOptionId,
    });
    await db.update(tripDateVotes).set({ votes: sql`votes + 1` }).where(eq(tripDateVotes.id, dateOptionId));
});
"#;

// =============================================================================
// Built-in scripts
// =============================================================================

#[test]
fn test_campbar_types_rewrites_routes() {
    let (dir, path) = project_with(CAMPBAR_ROUTES, ROUTES);

    let output = run_patch(&CampbarTypes, &RunOptions::with_root(dir.path())).unwrap();
    assert!(output.changed);
    assert!(!output.dry_run);
    assert_eq!(output.path, path);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("where(eq(tripBoards.id, getParam(id)))"));
    assert!(text.contains(
        ".insert(tripParticipants).values({\n            trip_id: getParam(id),\n            user_id: req.user.id,\n        status: 'joined',"
    ));
    assert!(text.contains(
        ".insert(tripDateUserVotes).values({\n            user_id: req.user.id,\n            date_option_id: getParam(dateOptionId),"
    ));
    assert!(text.contains("eq(tripDateUserVotes.dateOptionId, getParam(dateOptionId))"));
    assert!(text.contains("where(eq(tripDateVotes.id, getParam(dateOptionId)))"));
    assert!(!text.contains("tripId: id"));
}

#[test]
fn test_campbar_final_after_types() {
    let (dir, path) = project_with(CAMPBAR_ROUTES, ROUTES);
    let options = RunOptions::with_root(dir.path());

    run_patch(&CampbarTypes, &options).unwrap();
    let output = run_patch(&CampbarFinal, &options).unwrap();

    // The vote params were already wrapped, only the null check is left.
    assert_eq!(output.counts[0].count, 0);
    assert_eq!(output.counts[1].count, 0);
    assert_eq!(output.counts[2].count, 1);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("if (trip[0].currentParticipants! >= trip[0].maxParticipants!)"));
    assert!(!text.contains("getParam(getParam("));
}

#[test]
fn test_campbar_final_on_fresh_routes() {
    let (dir, path) = project_with(CAMPBAR_ROUTES, ROUTES);

    let output = run_patch(&CampbarFinal, &RunOptions::with_root(dir.path())).unwrap();
    assert_eq!(output.counts[0].count, 1);
    // eq(tripDateVotes.id, dateOptionId) closes a where(...) call
    assert_eq!(output.counts[1].count, 0);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("eq(tripDateUserVotes.dateOptionId, getParam(dateOptionId))"));
    assert!(text.contains("where(eq(tripDateVotes.id, dateOptionId))"));
}

#[test]
fn test_marketplace_banner_rewrites_page() {
    let page = r#"export default function MarketplacePage() {
    return (
        <div>
            <section className="hero">
                <div className="max-w-4xl mx-auto relative z-10 text-center md:text-left">
                    <h1>Marketplace</h1>
                </div>
                <div className="max-w-2xl mx-auto relative z-10">
                    <SearchBar />
                </div>
            </section>
        </div>
    );
}
"#;
    let (dir, path) = project_with(MARKETPLACE_PAGE, page);

    let output = run_patch(&MarketplaceBanner, &RunOptions::with_root(dir.path())).unwrap();
    assert_eq!(output.total(), 1);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("سُوْقُ الْبَرَكَةِ"));
    assert!(text.contains("Prinsip Adil & Transparan"));
    assert!(text.contains("Akad Suka Sama Suka"));
    assert!(text.contains("Keberkahan & Amanah"));
    assert!(text.find("<h1>Marketplace</h1>") < text.find("SYARIAH-BASED"));
    assert!(text.find("SYARIAH-BASED") < text.find("<SearchBar />"));
}

#[test]
fn test_unchanged_file_is_not_rewritten() {
    let source = "export const nothing = 1;\n";
    let (dir, path) = project_with(CAMPBAR_ROUTES, source);

    let output = run_patch(&CampbarTypes, &RunOptions::with_root(dir.path())).unwrap();
    assert!(!output.changed);
    assert_eq!(output.total(), 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), source);
}

// =============================================================================
// Dry run and strict mode
// =============================================================================

#[test]
fn test_dry_run_leaves_file_untouched() {
    let (dir, path) = project_with(CAMPBAR_ROUTES, ROUTES);

    let options = RunOptions::with_root(dir.path()).dry_run(true);
    let output = run_patch(&CampbarTypes, &options).unwrap();
    assert!(output.changed);
    assert!(output.dry_run);
    assert!(output.total() > 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), ROUTES);
}

#[test]
fn test_strict_reports_unmatched_rules() {
    let (dir, _) = project_with(CAMPBAR_ROUTES, ROUTES);

    let output = run_patch(&CampbarTypes, &RunOptions::with_root(dir.path())).unwrap();
    let err = output.ensure_all_matched().unwrap_err();
    match err {
        PatchError::Unmatched { labels, .. } => {
            assert!(labels.contains(&"getParam tripGearItems.id".to_string()));
            assert!(labels.contains(&"insert tripMessages".to_string()));
            assert!(!labels.contains(&"getParam tripBoards.id".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_strict_failure_leaves_file_untouched() {
    let source = "where(eq(tripBoards.id, id))\n";
    let (dir, path) = project_with(CAMPBAR_ROUTES, source);

    let options = RunOptions::with_root(dir.path()).strict(true);
    let err = run_patch(&CampbarTypes, &options).unwrap_err();
    assert!(matches!(err, PatchError::Unmatched { .. }));
    assert_eq!(fs::read(&path).unwrap(), source.as_bytes());
}

#[test]
fn test_strict_dry_run_still_reports_counts() {
    let source = "where(eq(tripBoards.id, id))\n";
    let (dir, path) = project_with(CAMPBAR_ROUTES, source);

    let options = RunOptions::with_root(dir.path()).dry_run(true).strict(true);
    let output = run_patch(&CampbarTypes, &options).unwrap();
    assert_eq!(output.counts[0].count, 1);
    assert!(output.ensure_all_matched().is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), source);
}

#[test]
fn test_strict_run_writes_when_every_rule_matches() {
    let source = "a(eq(tripDateUserVotes.dateOptionId, dateOptionId), x);\n\
                  b(eq(tripDateVotes.id, dateOptionId), y);\n\
                  if (trip[0].currentParticipants >= trip[0].maxParticipants) {}\n";
    let (dir, path) = project_with(CAMPBAR_ROUTES, source);

    let options = RunOptions::with_root(dir.path()).strict(true);
    let output = run_patch(&CampbarFinal, &options).unwrap();
    assert_eq!(output.total(), 3);
    assert_ne!(fs::read_to_string(&path).unwrap(), source);
}

#[test]
fn test_resolved_path_is_absolute_and_normalized() {
    let (dir, path) = project_with(CAMPBAR_ROUTES, ROUTES);

    let output = run_patch(&CampbarTypes, &RunOptions::with_root(dir.path().join("."))).unwrap();
    assert!(output.path.is_absolute());
    assert_eq!(output.path, path);

    let lines = CampbarTypes.success_lines(&output.path);
    assert!(!lines[0].contains("/./"));
}

// =============================================================================
// Error paths
// =============================================================================

#[test]
fn test_missing_target_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = run_patch(&CampbarTypes, &RunOptions::with_root(dir.path())).unwrap_err();
    assert!(matches!(err, PatchError::Io { .. }));
    assert!(!dir.path().join(CAMPBAR_ROUTES).exists());
}

#[test]
fn test_non_utf8_target_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(MARKETPLACE_PAGE);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let bytes: [u8; 5] = [0x3c, 0x64, 0xff, 0xfe, 0x3e];
    fs::write(&path, bytes).unwrap();

    let err = run_patch(&MarketplaceBanner, &RunOptions::with_root(dir.path())).unwrap_err();
    assert!(matches!(err, PatchError::Encoding(_)));
    assert_eq!(fs::read(&path).unwrap(), bytes);
}

// =============================================================================
// JSON plans
// =============================================================================

fn order_plan() -> PatchPlan {
    PatchPlan {
        name: "order-status".to_string(),
        target: PathBuf::from("server/src/routes/sellerRoutes.ts"),
        rules: vec![PlanRule {
            label: "wrap order id".to_string(),
            pattern: r"eq\(orders\.id, (\w+)\)".to_string(),
            replacement: "eq(orders.id, getParam(${1}))".to_string(),
            dot_all: false,
            not_followed_by: Some(")".to_string()),
        }],
        success_lines: vec!["✅ Order ids wrapped".to_string()],
    }
}

#[test]
fn test_plan_save_load_and_run() {
    let (dir, path) = project_with(
        "server/src/routes/sellerRoutes.ts",
        "a(eq(orders.id, orderId));\nb(eq(orders.id, id), x);\n",
    );
    let plan_path = dir.path().join("plan.json");
    order_plan().save_to_file(&plan_path).unwrap();

    let plan = PatchPlan::load_from_file(&plan_path).unwrap();
    assert_eq!(plan, order_plan());
    plan.validate().unwrap();

    let output = run_patch(&plan, &RunOptions::with_root(dir.path())).unwrap();
    assert_eq!(output.total(), 1);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "a(eq(orders.id, orderId));\nb(eq(orders.id, getParam(id)), x);\n"
    );
    assert_eq!(plan.success_lines(Path::new("ignored")), vec!["✅ Order ids wrapped"]);
}

#[test]
fn test_plan_with_bad_json_is_json_error() {
    let dir = TempDir::new().unwrap();
    let plan_path = dir.path().join("plan.json");
    fs::write(&plan_path, r#"{ "name": "x", "rules": [] "#).unwrap();
    assert!(matches!(
        PatchPlan::load_from_file(&plan_path),
        Err(PatchError::Json(_))
    ));
}
