use console::Style;
use skyfetch_core::pipeline::config::{PipelineConfig, RenderMode};
use skyfetch_core::pipeline::RunSummary;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
    good: Style,
    bad: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
            good: Style::new().green().bold(),
            bad: Style::new().red().bold(),
        }
    }
}

pub fn print_run_header(config: &PipelineConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("skyfetch"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(8)));
    println!();

    let q = &config.query;
    println!("  {:<14}{}", s.label.apply_to("Target"), s.value.apply_to(&q.target));
    println!("  {:<14}{}", s.label.apply_to("Collection"), s.value.apply_to(&q.collection));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Released"),
        s.value.apply_to(format!("after {}", q.release_after))
    );
    if q.include_auxiliaries {
        println!("  {:<14}{}", s.label.apply_to("Products"), s.method.apply_to("all"));
    }
    match config.limit {
        Some(n) => println!("  {:<14}{}", s.label.apply_to("Limit"), s.value.apply_to(n)),
        None => println!("  {:<14}{}", s.label.apply_to("Limit"), s.disabled.apply_to("none")),
    }

    match config.render.mode {
        RenderMode::Window => println!(
            "  {:<14}{}",
            s.label.apply_to("Render"),
            s.method.apply_to(config.render.mode)
        ),
        RenderMode::Png => println!(
            "  {:<14}{} {}",
            s.label.apply_to("Render"),
            s.method.apply_to(config.render.mode),
            s.path.apply_to(config.render.output_dir.display())
        ),
    }
    println!("  {:<14}{}", s.label.apply_to("Stretch"), s.method.apply_to(&config.render.stretch));
    if config.strict {
        println!("  {:<14}{}", s.label.apply_to("Errors"), s.bad.apply_to("strict"));
    }
    println!();
}

pub fn print_run_summary(summary: &RunSummary) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Summary"));
    println!(
        "    {:<12}{} found, {} kept",
        s.label.apply_to("Records"),
        s.value.apply_to(summary.records_found),
        s.value.apply_to(summary.records_kept)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Files"),
        s.value.apply_to(summary.outcomes.len())
    );
    println!("    {:<12}{}", s.label.apply_to("Rendered"), s.good.apply_to(summary.rendered()));
    println!("    {:<12}{}", s.label.apply_to("Skipped"), s.disabled.apply_to(summary.skipped()));
    let failed = summary.failed();
    if failed > 0 {
        println!("    {:<12}{}", s.label.apply_to("Failed"), s.bad.apply_to(failed));
    } else {
        println!("    {:<12}{}", s.label.apply_to("Failed"), s.value.apply_to(failed));
    }
    println!();
}
