use anyhow::{bail, Context as _, Result};
use rust_decimal::Decimal;

use super::Context;
use crate::api::TransactionFilter;
use crate::charts::{
    axis_max, category_totals, filter_by_category, needs_wants, split_summary, vendor_label,
    vendor_totals, VendorRules,
};
use crate::error::Error;
use crate::models::{parse_date, Category, SplitChoice};
use crate::pipeline::{
    group_by_mapping_config, page_count, paginate, submit_and_refresh, ChangeTracker,
    FieldChange, PageSize, TransactionCache,
};
use crate::store::{store_category_handoff, CategoryHandoff, Session};
use crate::ui::commands::parse_login;
use crate::ui::table::project_rows;
use crate::ui::util::{format_amount, plural};

pub(crate) fn as_cli(args: &[String], ctx: &Context) -> Result<()> {
    let result = match args[1].as_str() {
        "review" | "r" => cli_review(&args[2..], ctx),
        "categories" => cli_categories(ctx),
        "report" => cli_report(&args[2..], ctx),
        "submit" => cli_submit(&args[2..], ctx),
        "login" => cli_login(&args[2..], ctx),
        "logout" => cli_logout(ctx),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("splitui {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            bail!("Unknown command: {other}");
        }
    };

    if let Err(e) = &result {
        if matches!(e.downcast_ref::<Error>(), Some(Error::MissingIdentity)) {
            eprintln!("Not signed in. Run: splitui login <userid> [token]");
        }
    }
    result
}

fn print_usage() {
    println!("SplitTUI: review shared transactions and settle splits");
    println!();
    println!("Usage: splitui [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  review                        Print a page of transactions, grouped by mapping");
    println!("    --page <n>                  Page number (default: 1)");
    println!("    --per-page <n|all>          Rows per page (default: from config)");
    println!("    --status <status>           Status filter (default: pending)");
    println!("    --from/--to <YYYY-MM-DD>    Transaction date range");
    println!("    --csv-from/--csv-to <date>  Date-added range");
    println!("  categories                    List categories and split percentages");
    println!("  report                        Spending summary over reviewed transactions");
    println!("    --detail <category>         Hand one category off to the detail view");
    println!("  submit                        Submit edits as reviewed");
    println!("    --split <hash>=<yes|no>     Set the split decision (repeatable)");
    println!("    --category <hash>=<name>    Set the category (repeatable)");
    println!("  login <userid> [token]        Store the identity used for requests");
    println!("  logout                        Clear the stored identity");
    println!("  --verbose, -v                 Debug logging");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

// ── Argument helpers ─────────────────────────────────────────

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn flag_values<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .collect()
}

fn date_flag(args: &[String], flag: &str) -> Result<Option<chrono::NaiveDate>> {
    match flag_value(args, flag) {
        None => Ok(None),
        Some(s) => parse_date(s)
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("Invalid date for {flag}: {s}. Use YYYY-MM-DD")),
    }
}

fn filter_from_args(args: &[String], default_status: &str) -> Result<TransactionFilter> {
    let status = flag_value(args, "--status").unwrap_or(default_status);
    Ok(TransactionFilter {
        status: (!status.is_empty()).then(|| status.to_string()),
        start_date: date_flag(args, "--from")?,
        end_date: date_flag(args, "--to")?,
        csv_start_date: date_flag(args, "--csv-from")?,
        csv_end_date: date_flag(args, "--csv-to")?,
        date_params: Default::default(),
    })
}

/// `<hash>=<value>` pairs from a repeatable flag.
fn assignments<'a>(args: &'a [String], flag: &str) -> Result<Vec<(&'a str, &'a str)>> {
    flag_values(args, flag)
        .into_iter()
        .map(|pair| {
            pair.split_once('=')
                .filter(|(hash, value)| !hash.is_empty() && !value.is_empty())
                .ok_or_else(|| anyhow::anyhow!("Expected {flag} <hash>=<value>, got '{pair}'"))
        })
        .collect()
}

// ── Commands ─────────────────────────────────────────────────

fn cli_review(args: &[String], ctx: &Context) -> Result<()> {
    let session = Session::load(&ctx.store)?;
    let filter = filter_from_args(args, &ctx.config.review.default_status)?;
    let page_size = match flag_value(args, "--per-page") {
        Some(s) => PageSize::parse(s)?,
        None => ctx.config.review.page_size,
    };
    let page = match flag_value(args, "--page") {
        Some(s) => s
            .parse::<usize>()
            .ok()
            .filter(|p| *p > 0)
            .with_context(|| format!("Invalid page: {s}"))?,
        None => 1,
    };

    let records = ctx.gateway.list_transactions(&session, &filter)?;
    let categories = ctx.gateway.list_categories(&session)?;
    let mut cache = TransactionCache::new();
    cache.load(records);
    let tracker = ChangeTracker::new();

    if cache.is_empty() {
        println!("No transactions ({})", filter.describe());
        return Ok(());
    }

    for group in group_by_mapping_config(cache.all()) {
        let total = group.records.len();
        let pages = page_count(total, page_size);
        println!();
        println!("{} ({}, page {page}/{pages})", group.key, plural(total, "transaction"));
        println!("{}", "─".repeat(96));
        let rows = project_rows(
            paginate(&group.records, page_size, page),
            page,
            page_size.resolve(total),
            &tracker,
            &categories,
            ctx.config.review.id_display_len,
        );
        if rows.is_empty() {
            println!("  (no rows on this page)");
            continue;
        }
        println!(
            "{:>4} {:<14} {:<10} {:<28} {:>12} {:>10} {:>10} {:<5} Category",
            "#", "ID", "Date", "Description", "Amount", "Mine", "Partner", "Split"
        );
        for row in rows {
            let category = row.category.map(|c| c.label).unwrap_or_default();
            println!(
                "{:>4} {:<14} {:<10} {:<28} {:>12} {:>10} {:>10} {:<5} {}",
                row.seq,
                row.id,
                row.date,
                row.description,
                row.amount,
                row.after_split,
                row.partner_after_split,
                row.split.label(),
                category
            );
        }
    }
    Ok(())
}

fn cli_categories(ctx: &Context) -> Result<()> {
    let session = Session::load(&ctx.store)?;
    let categories = ctx.gateway.list_categories(&session)?;
    if categories.is_empty() {
        println!("No categories");
        return Ok(());
    }

    println!("{:<24} {:>8} Need", "Name", "Split %");
    println!("{}", "─".repeat(40));
    for cat in &categories {
        let split = cat
            .split_percent
            .map(|p| format!("{p}"))
            .unwrap_or_else(|| "-".into());
        let need = match cat.need {
            Some(true) => "yes",
            Some(false) => "no",
            None => "-",
        };
        println!("{:<24} {:>8} {}", cat.name, split, need);
    }
    Ok(())
}

fn cli_report(args: &[String], ctx: &Context) -> Result<()> {
    let session = Session::load(&ctx.store)?;
    let filter = filter_from_args(args, &ctx.config.review.report_status)?
        .with_date_params(ctx.config.review.report_date_params.clone());
    let records = ctx.gateway.list_transactions(&session, &filter)?;

    if let Some(category) = flag_value(args, "--detail") {
        let matching = filter_by_category(&records, category);
        if matching.is_empty() {
            bail!("No transactions in category '{category}'");
        }
        let handoff = CategoryHandoff {
            category: category.to_string(),
            records: matching,
        };
        store_category_handoff(&ctx.store, &handoff)?;
        println!(
            "Stored {} for '{category}'. Open the TUI and press 3 to view it",
            plural(handoff.records.len(), "transaction")
        );
        print_vendors(&handoff.records);
        return Ok(());
    }

    println!("SplitTUI report ({})", filter.describe());
    println!("{}", "─".repeat(40));
    if records.is_empty() {
        println!("  No transactions");
        return Ok(());
    }

    let total: Decimal = records.iter().map(|r| r.abs_amount()).sum();
    let nw = needs_wants(&records);
    let owed = split_summary(&records);
    println!("  Total spend:   {}", format_amount(total));
    println!("  Needs:         {}", format_amount(nw.needs));
    println!("  Wants:         {}", format_amount(nw.wants));
    println!("  Partner owes:  {}", format_amount(owed.partner_owes));
    println!("  You owe:       {}", format_amount(owed.you_owe));

    println!();
    println!("Spending by Category:");
    for (name, amount) in category_totals(&records) {
        let pct = if total.is_zero() {
            Decimal::ZERO
        } else {
            (amount / total * Decimal::ONE_HUNDRED).round_dp(1)
        };
        println!("  {name:<24} {:>12} {pct:>5}%", format_amount(amount));
    }

    print_vendors(&records);
    Ok(())
}

fn print_vendors(records: &[crate::models::Transaction]) {
    let totals = vendor_totals(records, &VendorRules::default());
    if totals.is_empty() {
        return;
    }
    println!();
    println!("Spending by Vendor (axis max {}):", format_amount(axis_max(&totals)));
    for (vendor, amount) in &totals {
        println!("  {:<16} {:>12}", vendor_label(vendor), format_amount(*amount));
    }
}

fn cli_submit(args: &[String], ctx: &Context) -> Result<()> {
    let session = Session::load(&ctx.store)?;
    let filter = filter_from_args(args, &ctx.config.review.default_status)?;
    let splits = assignments(args, "--split")?;
    let category_edits = assignments(args, "--category")?;
    if splits.is_empty() && category_edits.is_empty() {
        bail!("Usage: splitui submit --split <hash>=<yes|no> --category <hash>=<name>");
    }

    let categories = ctx.gateway.list_categories(&session)?;
    let mut cache = TransactionCache::new();
    cache.load(ctx.gateway.list_transactions(&session, &filter)?);

    let mut tracker = ChangeTracker::new();
    for (hash, name) in category_edits {
        let category = Category::find_by_name(&categories, name)
            .with_context(|| format!("Category '{name}' not found"))?;
        tracker.choose_category(hash, category);
    }
    for (hash, value) in splits {
        let choice = SplitChoice::parse(value)
            .with_context(|| format!("Invalid split for {hash}: {value}. Use yes or no"))?;
        let locked = cache
            .find_by_identity(hash)
            .is_some_and(|record| tracker.split_locked(record, &categories));
        if locked && choice == SplitChoice::Yes {
            bail!("{hash}: category is never split");
        }
        tracker.record_change(hash, FieldChange::Split(choice));
    }

    let outcome = submit_and_refresh(
        ctx.gateway.as_ref(),
        &session,
        &filter,
        &mut tracker,
        &mut cache,
    )?;
    println!("Submitted {}", plural(outcome.submitted, "change"));
    match outcome.refreshed {
        Some(count) => println!("{} still {}", plural(count, "transaction"), filter.describe()),
        None => println!("Refresh failed; run `splitui review` to reload"),
    }
    Ok(())
}

fn cli_login(args: &[String], ctx: &Context) -> Result<()> {
    let session = parse_login(&args.join(" "))?;
    session.save(&ctx.store)?;
    println!("Signed in as {}", session.user_id);
    Ok(())
}

fn cli_logout(ctx: &Context) -> Result<()> {
    Session::clear(&ctx.store)?;
    println!("Signed out");
    Ok(())
}
