//! Scripted banking session: registration, account operations, a month-end
//! batch, then reports.

use anyhow::{bail, Context, Result};
use minibank_bank::{Bank, BankConfig, BankInstance};
use minibank_core::{AccountNumber, CoreResult, CustomerId};
use minibank_reports::{write_report, AccountStatement, BankOverview, ReportData, ReportExporter};
use rust_decimal_macros::dec;
use std::path::Path;
use tracing::info;

/// Ids created by the scripted session
#[derive(Debug)]
pub struct Scenario {
    pub alice: CustomerId,
    pub bob: CustomerId,
    pub alice_checking: AccountNumber,
    pub alice_savings: AccountNumber,
    pub bob_checking: AccountNumber,
    pub bob_savings: AccountNumber,
}

pub fn run(
    config: &BankConfig,
    exporter: &dyn ReportExporter,
    out: Option<&Path>,
) -> Result<()> {
    let mut instance = BankInstance::new();
    let bank = instance.get_or_init_with(config);

    println!("🏦 {} ({})", bank.name(), bank.location());
    println!();

    let scenario = run_scenario(bank)?;
    info!(customers = bank.customer_count(), accounts = bank.account_count(), "session finished");

    print_reports(bank, &scenario, exporter, out)
}

/// Drive the bank through a month of activity.
pub fn run_scenario(bank: &mut Bank) -> Result<Scenario> {
    println!("== Customers ==");
    let alice = bank
        .register_customer("Alice", "Nguyen", "alice@example.com", "alice-secret")
        .context("failed to register Alice")?;
    let alice_id = alice.id();
    let alice_checking = alice.open_account("checking", dec!(1000))?.number();
    let alice_savings = alice.open_account("savings", dec!(5000))?.number();
    println!("✅ Registered {}", alice);

    let bob = bank
        .register_customer("Bob", "Tran", "bob@example.com", "bob-secret")
        .context("failed to register Bob")?;
    let bob_id = bob.id();
    let bob_checking = bob.open_account("Checking", dec!(5))?.number();
    let bob_savings = bob.open_account("SAVINGS", dec!(1500))?.number();
    println!("✅ Registered {}", bob);

    expect_rejection(
        "Duplicate registration",
        bank.register_customer("Alice", "Again", "alice@example.com", "x").map(|_| ()),
    )?;

    let who = bank.authenticate("alice@example.com", "alice-secret")?;
    println!("✅ Signed in as {}", who.full_name());
    expect_rejection(
        "Sign-in with wrong password",
        bank.authenticate("alice@example.com", "guess").map(|_| ()),
    )?;

    println!();
    println!("== Day 1 ==");
    {
        let alice = bank.get_customer_mut(alice_id)?;

        let balance = alice.get_account_mut(alice_checking)?.deposit(dec!(250))?;
        println!("✅ Deposit 250 into {} -> {}", alice_checking, balance);

        let balance = alice.get_account_mut(alice_checking)?.withdraw(dec!(300))?;
        println!("✅ Withdraw 300 from {} -> {}", alice_checking, balance);

        let (from, to) = alice.transfer(alice_checking, alice_savings, dec!(400))?;
        println!(
            "✅ Transfer 400 {} -> {}: balances {} / {}",
            alice_checking, alice_savings, from, to
        );
    }

    expect_rejection(
        "Withdraw 1450 below the savings minimum",
        bank.get_customer_mut(bob_id)?
            .get_account_mut(bob_savings)?
            .withdraw(dec!(1450))
            .map(|_| ()),
    )?;

    let (from, to) = bank.transfer_between_customers(
        alice_id,
        alice_checking,
        bob_id,
        bob_savings,
        dec!(200),
    )?;
    println!(
        "✅ Transfer 200 {} -> {}: balances {} / {}",
        alice_checking, bob_savings, from, to
    );

    expect_rejection(
        "Withdraw 200 over the daily limit",
        bank.get_customer_mut(alice_id)?
            .get_account_mut(alice_checking)?
            .withdraw(dec!(200))
            .map(|_| ()),
    )?;

    println!();
    println!("== Month end ==");
    let interest = bank.apply_interest_to_all_savings_accounts()?;
    println!("✅ Interest paid: {}", interest.round_dp(2));
    let fees = bank.charge_monthly_fees()?;
    println!("✅ Fees collected: {}", fees);

    println!();
    println!("== Day 2 ==");
    let reset = bank.start_new_day();
    println!("✅ Daily limits reset on {} accounts", reset);
    let balance = bank
        .get_customer_mut(alice_id)?
        .get_account_mut(alice_checking)?
        .withdraw(dec!(200))?;
    println!("✅ Withdraw 200 from {} -> {}", alice_checking, balance);
    println!();

    Ok(Scenario {
        alice: alice_id,
        bob: bob_id,
        alice_checking,
        alice_savings,
        bob_checking,
        bob_savings,
    })
}

/// The step is expected to be refused; a success means the session is broken.
fn expect_rejection(label: &str, result: CoreResult<()>) -> Result<()> {
    match result {
        Err(e) => {
            println!("❌ {}: {}", label, e);
            Ok(())
        }
        Ok(()) => bail!("{} unexpectedly succeeded", label),
    }
}

fn print_reports(
    bank: &mut Bank,
    scenario: &Scenario,
    exporter: &dyn ReportExporter,
    out: Option<&Path>,
) -> Result<()> {
    let overview: Box<dyn ReportData> = Box::new(BankOverview::from_bank(bank));
    let mut reports = vec![("bank-report".to_string(), overview)];

    let accounts = [
        (scenario.alice, scenario.alice_checking),
        (scenario.alice, scenario.alice_savings),
        (scenario.bob, scenario.bob_checking),
        (scenario.bob, scenario.bob_savings),
    ];
    for (customer, number) in accounts {
        let snapshot = bank.get_customer(customer)?.get_account(number)?.statement();
        let statement: Box<dyn ReportData> = Box::new(AccountStatement::from(snapshot));
        reports.push((format!("statement-{}", number), statement));
    }

    if let Some(dir) = out {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    for (stem, report) in &reports {
        println!("{}", exporter.export(report.as_ref()));

        if let Some(dir) = out {
            let path = write_report(exporter, report.as_ref(), dir, stem)
                .with_context(|| format!("failed to write {} report", stem))?;
            println!("📄 Written to {} ({})", path.display(), exporter.mime_type());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use minibank_core::password;
    use minibank_reports::CsvExporter;
    use rust_decimal::Decimal;

    fn test_bank() -> Bank {
        let mut config = BankConfig::default();
        config.security.bcrypt_cost = password::MIN_COST;
        Bank::from_config(&config)
    }

    #[test]
    fn test_scenario_outcome() {
        let mut bank = test_bank();
        let scenario = run_scenario(&mut bank).unwrap();

        assert_eq!(bank.customer_count(), 2);
        assert_eq!(bank.account_count(), 4);

        let alice = bank.get_customer(scenario.alice).unwrap();
        // 1000 + 250 - 300 - 400 - 200 - 10 fee - 200
        assert_eq!(alice.get_account(scenario.alice_checking).unwrap().balance(), dec!(140));
        let bob = bank.get_customer(scenario.bob).unwrap();
        // fee skipped
        assert_eq!(bob.get_account(scenario.bob_checking).unwrap().balance(), dec!(5));

        // 5400 × 0.02 / 12 + 1700 × 0.02 / 12
        let interest = dec!(9) + dec!(34) / dec!(12);
        let expected = dec!(1000000) - interest + dec!(10);
        assert!((bank.bank_balance() - expected).abs() < dec!(0.000001));
    }

    #[test]
    fn test_scenario_balances_match_history() {
        let mut bank = test_bank();
        run_scenario(&mut bank).unwrap();

        for customer in bank.customers() {
            for account in customer.get_accounts() {
                let sum: Decimal = account.transactions().iter().map(|t| t.balance_effect()).sum();
                assert_eq!(account.balance(), sum);
            }
        }
    }

    #[test]
    fn test_reports_written_to_directory() {
        let mut bank = test_bank();
        let scenario = run_scenario(&mut bank).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let exporter = CsvExporter::new();
        print_reports(&mut bank, &scenario, &exporter, Some(dir.path())).unwrap();

        let overview = std::fs::read_to_string(dir.path().join("bank-report.csv")).unwrap();
        assert!(overview.starts_with("Customer ID,Name,Email"));
        assert!(dir
            .path()
            .join(format!("statement-{}.csv", scenario.bob_savings))
            .exists());
    }

    #[test]
    fn test_expect_rejection() {
        let refused = Err(minibank_core::CoreError::AuthenticationFailed);
        assert!(expect_rejection("ok", refused).is_ok());
        assert!(expect_rejection("bad", Ok(())).is_err());
    }
}
