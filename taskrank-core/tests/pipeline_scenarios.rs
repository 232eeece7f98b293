use chrono::NaiveDate;
use taskrank_core::urgency::due_in;
use taskrank_core::{
    AnalysisPipeline, AnalyzeRequest, Strategy, Task, ValidationError, read_tasks_csv,
};

fn today() -> NaiveDate {
    // Wednesday
    NaiveDate::from_ymd_opt(2026, 2, 18).unwrap()
}

fn sprint_backlog() -> Vec<Task> {
    let t = today();
    vec![
        Task::new("fix-login", "Fix login bug")
            .with_due_date(due_in(t, -2))
            .with_hours(3.0)
            .with_importance(9),
        Task::new("docs", "Update README")
            .with_due_date(due_in(t, 20))
            .with_hours(1.0)
            .with_importance(3),
        Task::new("schema", "Design DB schema")
            .with_due_date(due_in(t, 5))
            .with_hours(6.0)
            .with_importance(8),
        Task::new("api", "Build API endpoints")
            .with_due_date(due_in(t, 9))
            .with_hours(12.0)
            .with_importance(7)
            .depends_on("schema"),
        Task::new("ui", "Frontend views")
            .with_due_date(due_in(t, 40))
            .with_hours(16.0)
            .with_importance(5)
            .depends_on("api")
            .depends_on("schema"),
    ]
}

/// Five distinct scores -> exactly three ranked suggestions, best first.
#[test]
fn test_suggest_returns_top_three_in_order() {
    let pipeline = AnalysisPipeline::new(today());
    let full = pipeline.analyze(&sprint_backlog(), Strategy::SmartBalance).unwrap();
    let s = pipeline.suggest(&sprint_backlog(), Strategy::SmartBalance).unwrap();

    assert_eq!(s.suggestions.len(), 3);
    for (i, sug) in s.suggestions.iter().enumerate() {
        assert_eq!(sug.rank, i + 1);
        assert_eq!(sug.task.task.id, full.tasks[i].task.id);
        assert!(!sug.explanation.is_empty());
        assert!(sug.explanation.starts_with(&format!("Ranked #{}: ", i + 1)));
    }
    assert!(s.suggestions[0].task.priority_score > s.suggestions[1].task.priority_score);
    assert!(s.suggestions[1].task.priority_score > s.suggestions[2].task.priority_score);
    assert_eq!(s.suggestions[0].task.task.id, "fix-login");
}

#[test]
fn test_strategies_reorder_the_same_batch() {
    let pipeline = AnalysisPipeline::new(today());
    let fastest = pipeline.analyze(&sprint_backlog(), Strategy::FastestWins).unwrap();
    let impact = pipeline.analyze(&sprint_backlog(), Strategy::HighImpact).unwrap();

    let pos = |a: &taskrank_core::Analysis, id: &str| {
        a.tasks.iter().position(|t| t.task.id == id).unwrap()
    };
    // The one-hour README task climbs under fastest_wins.
    assert!(pos(&fastest, "docs") < pos(&impact, "docs"));
}

#[test]
fn test_analyze_is_deterministic() {
    let pipeline = AnalysisPipeline::new(today());
    let a = pipeline.analyze(&sprint_backlog(), Strategy::SmartBalance).unwrap();
    let b = pipeline.analyze(&sprint_backlog(), Strategy::SmartBalance).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_cycle_members_flagged_in_output() {
    let tasks = vec![
        Task::new("A", "A").depends_on("B"),
        Task::new("B", "B").depends_on("C"),
        Task::new("C", "C").depends_on("A"),
        Task::new("D", "D").depends_on("A"),
    ];
    let a = AnalysisPipeline::new(today())
        .analyze(&tasks, Strategy::SmartBalance)
        .unwrap();
    for t in &a.tasks {
        let expected = t.task.id != "D";
        assert_eq!(t.has_circular_dependency, expected, "{}", t.task.id);
    }
}

#[test]
fn test_json_request_round_trip_shape() {
    let body = format!(
        r#"{{
            "strategy": "deadline_driven",
            "tasks": [
                {{"title": "Pay rent", "due_date": "{}", "importance": 8}},
                {{"id": "x", "title": "Clean desk", "estimated_hours": 0.5, "dependencies": ["nope"]}}
            ]
        }}"#,
        due_in(today(), 3)
    );
    let req: AnalyzeRequest = serde_json::from_str(&body).unwrap();
    let a = AnalysisPipeline::new(today()).analyze_request(req).unwrap();
    let v = serde_json::to_value(&a).unwrap();

    assert_eq!(v["strategy"], "deadline_driven");
    assert_eq!(v["total_count"], 2);
    assert_eq!(v["tasks"][0]["id"], "task-1");
    // 2026-02-21 is a Saturday.
    assert_eq!(v["tasks"][0]["weekend_due"], true);
    assert_eq!(v["tasks"][0]["score_breakdown"]["urgency"], 81.0);
    assert!(v["tasks"][1].get("weekend_due").is_none());
    assert!(v["warnings"].is_array());
}

#[test]
fn test_validation_errors_surface() {
    let pipeline = AnalysisPipeline::new(today());
    let missing_title: AnalyzeRequest =
        serde_json::from_str(r#"{"tasks":[{"title":"ok"},{"importance":3}]}"#).unwrap();
    assert_eq!(
        pipeline.analyze_request(missing_title),
        Err(ValidationError::MissingTitle { index: 1 })
    );

    let empty: AnalyzeRequest = serde_json::from_str(r#"{"tasks":[]}"#).unwrap();
    assert_eq!(pipeline.analyze_request(empty), Err(ValidationError::EmptyBatch));
}

#[test]
fn test_csv_batch_through_pipeline() {
    let csv = "\
id,title,due_date,estimated_hours,importance,dependencies
schema,Design schema,2026-02-20,4,8,
api,Build API,2026-02-27,10,7,schema
ui,Build UI,2026-03-20,12,5,api;schema
";
    let inputs = read_tasks_csv(csv.as_bytes()).unwrap();
    let s = AnalysisPipeline::new(today())
        .suggest_request(AnalyzeRequest {
            tasks: inputs,
            strategy: None,
        })
        .unwrap();
    assert_eq!(s.strategy, Strategy::SmartBalance);
    assert_eq!(s.suggestions[0].task.task.id, "schema");
    assert!(s.suggestions[0].explanation.contains("unblocks other work"));
}

#[test]
fn test_lenient_request_fields_are_scored_not_rejected() {
    let body = r#"{"tasks":[
        {"id":"task-2","title":"explicit","importance":8.0},
        {"title":"no id","importance":"3","dependencies":["task-2"]}
    ]}"#;
    let req: AnalyzeRequest = serde_json::from_str(body).unwrap();
    let a = AnalysisPipeline::new(today()).analyze_request(req).unwrap();

    let explicit = a.tasks.iter().find(|t| t.task.id == "task-2").unwrap();
    assert_eq!(explicit.score_breakdown.importance, 80.0);
    assert_eq!(explicit.score_breakdown.dependencies, 55.0);

    let assigned = a.tasks.iter().find(|t| t.task.id == "task-2-2").unwrap();
    assert_eq!(assigned.score_breakdown.importance, 30.0);
    assert!(!assigned.has_circular_dependency);
}
