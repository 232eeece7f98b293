//! Plain-text output for the terminal.

use taskrank_core::{Analysis, ScoredTask, StrategyProfile, Suggestions};

pub fn print_analysis(a: &Analysis, limit: Option<usize>) {
    println!("# Ranked tasks ({}, {} total)\n", a.strategy, a.total_count);
    for (i, t) in a.tasks.iter().take(limit.unwrap_or(usize::MAX)).enumerate() {
        println!("{:>2}. {}", i + 1, task_line(t));
    }
    print_warning_summary(a.warnings.len());
}

pub fn print_suggestions(s: &Suggestions) {
    println!("# Top picks ({})\n", s.strategy);
    for sug in &s.suggestions {
        println!("{:>2}. {}", sug.rank, task_line(&sug.task));
        println!("    {}\n", sug.explanation);
    }
    print_warning_summary(s.warnings.len());
}

pub fn print_strategies(profiles: &[StrategyProfile]) {
    for p in profiles {
        let w = p.weights;
        println!("{} ({})", p.id, p.label);
        println!("  {}", p.description);
        println!(
            "  urgency={:.2} importance={:.2} effort={:.2} dependencies={:.2}\n",
            w.urgency, w.importance, w.effort, w.dependencies
        );
    }
}

fn task_line(t: &ScoredTask) -> String {
    let b = &t.score_breakdown;
    let mut flags = String::new();
    if t.has_circular_dependency {
        flags.push_str(" [cycle]");
    }
    if t.weekend_due {
        flags.push_str(" [weekend]");
    }
    format!(
        "[{:>6.2}] {} ({}) | due={} | u={:.1} i={:.1} e={:.1} d={:.1}{}",
        t.priority_score,
        t.task.title,
        t.task.id,
        t.task.due_date.as_deref().unwrap_or("-"),
        b.urgency,
        b.importance,
        b.effort,
        b.dependencies,
        flags
    )
}

fn print_warning_summary(count: usize) {
    if count > 0 {
        println!(
            "\n({count} field(s) missing or malformed; defaults applied. \
             Use --log-level debug for details.)"
        );
    }
}
