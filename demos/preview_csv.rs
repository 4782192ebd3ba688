use controle_gastos::{ImportBuilder, MonthLocale};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let file_path = if args.len() > 1 {
        &args[1]
    } else {
        println!("Using example statement from demos/sample.csv\n");
        "demos/sample.csv"
    };

    let builder = ImportBuilder::new()
        .filename(file_path)
        .locale(MonthLocale::PtBr);

    let outcome = builder.transform()?;
    println!(
        "Read {} lines, {} expenses, {} ignored\n",
        outcome.lines_read,
        outcome.produced(),
        outcome.ignored
    );

    for skip in &outcome.skipped {
        println!(
            "  line {}: {} ({})",
            skip.line,
            skip.title.as_deref().unwrap_or("-"),
            skip.reason
        );
    }

    let preview = ImportBuilder::new().filename(file_path).preview(&[])?;

    println!("\nBy month:");
    for month in &preview.month_totals {
        println!(
            "  {:02}/{}  total {:>10}  paid {:>10}  open {:>10}",
            month.month, month.year, month.total, month.paid, month.open
        );
    }

    println!("\nTop expenses:");
    for item in &preview.top_items {
        match (item.installment, item.installment_total) {
            (Some(i), Some(t)) => println!("  {} ({}/{}): {}", item.description, i, t, item.amount),
            _ => println!("  {}: {}", item.description, item.amount),
        }
    }

    println!("\n{}", serde_json::to_string_pretty(&preview.category_totals)?);

    Ok(())
}
