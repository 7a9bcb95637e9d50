//! Import a bank export and print the financial reports
//!
//! Run with `RUST_LOG=debug` to see the storage traffic.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use club_ledger::utils::MemoryStorage;
use club_ledger::{BankImportRequest, Ledger};
use std::str::FromStr;

const BANK_EXPORT: &str = "\
03/07/2024\t50.00\tRaffle tickets
15/06/2024\t-25.50\tASR Electrical Services
02/06/2024\t100.00\tSponsorship Lake Health Group
20/05/2024\t1,200.00\tTidyHQ payout
01/05/2024\t-40.00\tTrophy shop engraving
";

const CASH_EXPORT: &str = "10/06/2024,-5.00,Flowers for presentation night\n";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("🧾 Club Ledger - Bank Import and Reporting\n");

    let storage = MemoryStorage::new();
    let mut ledger = Ledger::new(storage.clone());

    // 1. Import the bank and cash exports
    println!("📥 Importing statements...");
    for (csv, balance, ledger_type) in [
        (BANK_EXPORT, "2000.00", "BANK"),
        (CASH_EXPORT, "20.00", "CASH"),
    ] {
        let summary = ledger
            .import_bank_csv(BankImportRequest {
                csv: csv.to_string(),
                current_balance: Some(BigDecimal::from_str(balance)?),
                ledger_type: Some(ledger_type.to_string()),
            })
            .await?;
        println!(
            "  ✓ {}: {} transactions over {:?}, opening {} closing {}",
            summary.ledger_type,
            summary.transactions,
            summary.months,
            summary.opening_balance,
            summary.closing_balance
        );
    }
    println!();

    // 2. Show a month register
    println!("📒 BANK register for 2024-06:");
    let register = ledger.month_register("BANK", "2024-06").await?;
    println!("  Opening balance: {}", register.opening_balance);
    for txn in &register.transactions {
        println!(
            "  {} {:<35} {:<12} {:>10} {:>10}",
            txn.date, txn.description, txn.category, txn.amount, txn.running_balance
        );
    }
    println!("  Closing balance: {}\n", register.closing_balance);

    // 3. Reports as of 1 August 2024
    let now = NaiveDate::from_ymd_opt(2024, 8, 1)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .ok_or("invalid report date")?;
    for period in ["fy-1", "ytd"] {
        let report = ledger.financial_report(period, now).await?;
        println!("📊 {} ({}):", report.label, report.range);
        println!("{}\n", serde_json::to_string_pretty(&report)?);
    }

    println!("🗂  Stored documents: {:?}", storage.keys());
    Ok(())
}
