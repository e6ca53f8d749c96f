use crate::engine::{
    BucketBreakdown, Classification, MenuItemAllocation, ResidentTextureRequirement,
    ServingsBreakdown, VariantResult, WeeklyMenuNutritionReport,
};
use crate::models::NutritionSummary;

fn format_nutrition(n: &NutritionSummary) -> String {
    let mut s = format!(
        "{:.0} kcal | P {:.1} g | F {:.1} g | C {:.1} g",
        n.calories, n.protein, n.fat, n.carbs
    );
    if let Some(fiber) = n.fiber {
        s.push_str(&format!(" | fiber {:.1} g", fiber));
    }
    if let Some(sodium) = n.sodium {
        s.push_str(&format!(" | Na {:.1} mg", sodium));
    }
    s
}

fn display_bucket(label: &str, bucket: &BucketBreakdown) {
    if bucket.count == 0 {
        return;
    }

    println!("{:<13} {:>4}  {}", label, bucket.count, format_nutrition(&bucket.nutrition));

    for member in &bucket.members {
        if member.reasons.is_empty() {
            continue;
        }
        println!(
            "    - {} (#{}): {}",
            member.resident.name,
            member.resident.id,
            member.reasons.join("; ")
        );
    }

    for item in &bucket.ingredients {
        println!(
            "    * {:<20} {:>8.1} {} x {} = {:.1} {}",
            item.name,
            item.per_serving,
            item.unit.symbol(),
            bucket.count,
            item.total,
            item.unit.symbol()
        );
    }
}

/// Display a servings breakdown as a table of buckets.
pub fn display_breakdown(b: &ServingsBreakdown) {
    println!();
    println!("=== {} (#{}) on {} ===", b.dish_name, b.dish_id, b.evaluation_date);
    println!();

    if b.population == 0 {
        println!("No residents in the population.");
        println!();
        return;
    }

    display_bucket("Regular", &b.regular);
    display_bucket("Allergy-safe", &b.allergy_safe);
    display_bucket("Low-sugar", &b.low_sugar);
    display_bucket("Low-sodium", &b.low_sodium);
    display_bucket("Minced", &b.minced);
    display_bucket("Pureed", &b.pureed);

    if !b.excluded.is_empty() {
        println!();
        println!("Excluded ({}):", b.excluded.len());
        for e in &b.excluded {
            println!("    - {} (#{}): {}", e.resident.name, e.resident.id, e.reason);
        }
    }

    println!();
    println!("--- Summary ---");
    println!("Population: {}", b.population);
    println!("Total servings: {}", b.total);
    println!();
}

/// Display one resident's classification against a dish.
pub fn display_classification(dish_name: &str, resident_name: &str, c: &Classification) {
    println!();
    println!("=== {} for {} ===", dish_name, resident_name);

    if c.allergy_conflicts.is_empty() {
        println!("Allergies:       none");
    } else {
        for conflict in &c.allergy_conflicts {
            println!("Allergy:         {}", conflict.reason());
        }
    }

    let flag = |b: bool| if b { "VIOLATED" } else { "ok" };
    println!("Low-sugar:       {}", flag(c.low_sugar_violation));
    println!("Low-sodium:      {}", flag(c.low_sodium_violation));
    println!("Gluten-free:     {}", flag(c.gluten_violation));
    println!("Lactose-free:    {}", flag(c.lactose_violation));
    println!("Texture:         {}", c.required_texture);
    println!();
}

/// Display a texture variant request.
pub fn display_variant(dish_name: &str, r: &VariantResult) {
    println!();
    if r.success {
        let action = if r.created { "created" } else { "using" };
        println!(
            "{} -> {}: {} '{}' (#{})",
            r.original_texture,
            r.target_texture,
            action,
            r.variant_name.as_deref().unwrap_or(dish_name),
            r.variant_id.unwrap_or_default()
        );
    } else {
        println!(
            "{} -> {}: refused ({})",
            r.original_texture,
            r.target_texture,
            r.error.as_deref().unwrap_or("unknown reason")
        );
    }
    println!();
}

/// Display per-resident texture requirements.
pub fn display_texture_requirements(dish_name: &str, reqs: &[ResidentTextureRequirement]) {
    println!();
    println!("=== Texture requirements for {} ===", dish_name);
    println!();

    if reqs.is_empty() {
        println!("No residents.");
        println!();
        return;
    }

    let max_name_len = reqs.iter().map(|r| r.resident.name.len()).max().unwrap_or(10);

    for r in reqs {
        let outcome = if r.variant.success {
            format!(
                "-> {}",
                r.variant.variant_name.as_deref().unwrap_or(dish_name)
            )
        } else {
            format!("!! {}", r.variant.error.as_deref().unwrap_or("refused"))
        };
        println!(
            "  {:<width$}  {:<8} {}",
            r.resident.name,
            r.required_texture.label(),
            outcome,
            width = max_name_len
        );
    }
    println!();
}

/// Display planned servings for every menu item.
pub fn display_menu_plan(allocations: &[MenuItemAllocation]) {
    println!();
    println!("=== Menu Servings ===");
    println!();

    if allocations.is_empty() {
        println!("Menu has no items.");
        println!();
        return;
    }

    for a in allocations {
        let source = if a.auto { "auto" } else { "fixed" };
        let note = if a.variant_missing {
            "  [texture variant missing, base dish used]"
        } else {
            ""
        };
        println!(
            "Day {} {:<9} {:<30} {:>4} servings ({}) | allergy-safe {} | minced {} | pureed {} | excluded {}{}",
            a.day + 1,
            a.slot.label(),
            a.breakdown.dish_name,
            a.servings,
            source,
            a.breakdown.allergy_safe.count,
            a.breakdown.minced.count,
            a.breakdown.pureed.count,
            a.breakdown.excluded.len(),
            note
        );
    }
    println!();
}

/// Display a weekly nutrition report.
pub fn display_weekly_report(report: &WeeklyMenuNutritionReport) {
    println!();
    println!("=== {} (#{}) ===", report.menu_name, report.menu_id);

    for day in &report.days {
        println!();
        match day.date {
            Some(date) => println!("Day {} ({})", day.day + 1, date),
            None => println!("Day {}", day.day + 1),
        }
        for slot in day.slots.iter().filter(|s| s.item_count > 0) {
            let status = if slot.within_guidelines() { "" } else { "  [!]" };
            println!(
                "  {:<9} {}{}",
                slot.slot.label(),
                format_nutrition(&slot.summary),
                status
            );
        }
        println!("  {:<9} {}", "Total", format_nutrition(&day.total));
    }

    println!();
    println!("--- Summary ---");
    println!("Weekly total:  {}", format_nutrition(&report.weekly_total));
    println!("Daily average: {}", format_nutrition(&report.daily_average));

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for w in &report.warnings {
            println!("  - {}", w);
        }
        println!("Recommendations:");
        for r in &report.recommendations {
            println!("  - {}", r);
        }
    }
    println!();
}
