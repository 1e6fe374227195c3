//! Loan Discord commands - eligibility, quotes, applications, schedules and repayments.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            loan::{self, LoanApplication},
            loan_calculator, member, money, report,
        },
        entities::{LoanModel, LoanStatus, PaymentMethod},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    const NOT_A_MEMBER: &str = "❌ You are not a member yet. Use `/register` to join.";

    fn status_emoji(status: LoanStatus) -> &'static str {
        match status {
            LoanStatus::Pending => "⏳",
            LoanStatus::Approved => "👍",
            LoanStatus::Rejected => "🚫",
            LoanStatus::Disbursed => "💸",
            LoanStatus::Completed => "✅",
        }
    }

    fn bullet_list(reasons: &[String]) -> String {
        reasons
            .iter()
            .map(|r| format!("• {r}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Looks up one of the caller's own loans. Other members' loans are reported as missing.
    async fn own_loan(
        ctx: poise::Context<'_, BotData, Error>,
        member_id: i64,
        loan_id: i64,
    ) -> Result<Option<LoanModel>> {
        let db = &ctx.data().database;
        Ok(loan::get_loan_by_id(db, loan_id)
            .await?
            .filter(|l| l.member_id == member_id))
    }

    /// Checks whether you can borrow right now, and how much.
    #[poise::command(slash_command, prefix_command)]
    pub async fn loan_eligibility(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let Some(me) = member::get_member_by_user(db, &user_id).await? else {
            ctx.say(NOT_A_MEMBER).await?;
            return Ok(());
        };

        let eligibility = loan_calculator::calculate_eligibility(db, me.id).await?;

        let (title, color) = if eligibility.eligible {
            ("✅ You are eligible for a loan", 0x002E_CC71)
        } else {
            ("❌ You are not eligible for a loan yet", 0x00E7_4C3C)
        };

        let mut summary = String::new();
        writeln!(
            &mut summary,
            "**Maximum amount:** {}",
            report::format_money(eligibility.max_amount)
        )?;
        writeln!(
            &mut summary,
            "**Credit score:** {} (minimum {})",
            eligibility.current_credit_score, eligibility.min_credit_score
        )?;
        write!(
            &mut summary,
            "**Contribution history:** {} months (minimum {})",
            eligibility.contribution_history,
            loan_calculator::MIN_CONTRIBUTION_MONTHS
        )?;

        let embed = serenity::CreateEmbed::default()
            .title(title)
            .color(color)
            .description(summary)
            .field("Details", bullet_list(&eligibility.reasons), false);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Prices a loan at your current score and checks whether you can afford it.
    #[poise::command(slash_command, prefix_command)]
    pub async fn loan_quote(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Amount to borrow"] amount: f64,
        #[description = "Repayment period in months"] term_months: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();
        let limits = &ctx.data().config.lending;

        let Some(me) = member::get_member_by_user(db, &user_id).await? else {
            ctx.say(NOT_A_MEMBER).await?;
            return Ok(());
        };

        let amount = money::from_f64(amount)?;
        if amount < limits.min_loan_amount {
            ctx.say(format!(
                "❌ The minimum loan amount is {} {}.",
                limits.currency,
                money::format_amount(limits.min_loan_amount)
            ))
            .await?;
            return Ok(());
        }
        let term = match loan::validate_loan_amount(amount, limits)
            .and_then(|()| loan::validate_term(term_months, limits))
        {
            Ok(term) => term,
            Err(e @ (Error::InvalidAmount { .. } | Error::InvalidTerm { .. })) => {
                ctx.say(format!("❌ {e}")).await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let details = loan_calculator::calculate_loan_details(amount, term, me.credit_score);
        let affordability =
            loan_calculator::calculate_affordability(db, me.id, amount, term).await?;

        let mut pricing = String::new();
        writeln!(
            &mut pricing,
            "**Interest rate:** {}% per year",
            details.interest_rate
        )?;
        writeln!(
            &mut pricing,
            "**Monthly payment:** {}",
            report::format_money(details.monthly_payment)
        )?;
        writeln!(
            &mut pricing,
            "**Total payable:** {}",
            report::format_money(details.total_payable)
        )?;
        write!(
            &mut pricing,
            "**Total interest:** {}",
            report::format_money(details.total_interest)
        )?;

        let mut budget = String::new();
        writeln!(
            &mut budget,
            "**Estimated monthly income:** {}",
            report::format_money(affordability.monthly_income)
        )?;
        writeln!(
            &mut budget,
            "**Debt-to-income:** {}%",
            affordability.debt_to_income_ratio.round_dp(1)
        )?;
        writeln!(
            &mut budget,
            "**Affordable payment:** {}",
            report::format_money(affordability.max_affordable_payment)
        )?;
        write!(&mut budget, "{}", bullet_list(&affordability.reasons))?;

        let color = if affordability.affordable {
            0x002E_CC71
        } else {
            0x00F3_9C12
        };

        let embed = serenity::CreateEmbed::default()
            .title(format!(
                "🧮 Quote: {} over {term} months",
                report::format_money(details.amount)
            ))
            .color(color)
            .field("Pricing", pricing, false)
            .field("Affordability", budget, false)
            .footer(serenity::CreateEmbedFooter::new(
                "Quotes are estimates. Use /apply_loan to submit an application.",
            ));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Applies for a loan. Applications are reviewed by an administrator.
    #[poise::command(slash_command, prefix_command)]
    pub async fn apply_loan(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Amount to borrow"] amount: f64,
        #[description = "Repayment period in months"] term_months: i64,
        #[description = "What the loan is for"] purpose: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();
        let limits = &ctx.data().config.lending;

        let Some(me) = member::get_member_by_user(db, &user_id).await? else {
            ctx.say(NOT_A_MEMBER).await?;
            return Ok(());
        };

        let amount = money::from_f64(amount)?;

        match loan::apply_for_loan(db, me.id, amount, term_months, &purpose, limits).await {
            Ok(LoanApplication::Submitted { loan, details }) => {
                ctx.say(format!(
                    "📝 Loan application `#{}` submitted for **{}** over {} months at {}%.\n\
                     Monthly payment: **{}**. An administrator will review it shortly.",
                    loan.id,
                    report::format_money(details.amount),
                    details.term_months,
                    details.interest_rate,
                    report::format_money(details.monthly_payment)
                ))
                .await?;
            }
            Ok(LoanApplication::Rejected { reasons }) => {
                ctx.say(format!(
                    "❌ Your application could not be submitted:\n{}",
                    bullet_list(&reasons)
                ))
                .await?;
            }
            Err(Error::InvalidAmount { amount }) if amount < limits.min_loan_amount => {
                ctx.say(format!(
                    "❌ The minimum loan amount is {} {}.",
                    limits.currency,
                    money::format_amount(limits.min_loan_amount)
                ))
                .await?;
            }
            Err(
                e @ (Error::InvalidAmount { .. } | Error::InvalidTerm { .. } | Error::Config { .. }),
            ) => {
                ctx.say(format!("❌ {e}")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Lists all of your loans.
    #[poise::command(slash_command, prefix_command)]
    pub async fn my_loans(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let Some(me) = member::get_member_by_user(db, &user_id).await? else {
            ctx.say(NOT_A_MEMBER).await?;
            return Ok(());
        };

        let loans = loan::get_loans_for_member(db, me.id).await?;
        if loans.is_empty() {
            ctx.say("You have no loans. Use `/loan_eligibility` to see what you can borrow.")
                .await?;
            return Ok(());
        }

        let mut embed_fields = Vec::new();
        for l in loans.iter().take(25) {
            let field_name = format!(
                "{} Loan #{} - {}",
                status_emoji(l.status),
                l.id,
                report::format_money(l.amount())
            );
            let mut field_value = String::new();
            writeln!(&mut field_value, "**Status:** {}", l.status)?;
            writeln!(
                &mut field_value,
                "**Terms:** {} months at {}%",
                l.term,
                l.interest_rate()
            )?;
            writeln!(
                &mut field_value,
                "**Paid:** {} of {}",
                report::format_money(l.amount_paid()),
                report::format_money(l.total_payable())
            )?;
            if l.is_active() {
                writeln!(
                    &mut field_value,
                    "**Remaining:** {}",
                    report::format_money(l.remaining_balance())
                )?;
            }
            if let Some(next) = l.next_payment_date {
                write!(
                    &mut field_value,
                    "**Next payment:** {} on {}",
                    report::format_money(l.monthly_payment()),
                    next.format("%Y-%m-%d")
                )?;
            }
            write!(&mut field_value, "\n*{}*", l.purpose)?;
            embed_fields.push((field_name, field_value, false));
        }

        let embed = serenity::CreateEmbed::default()
            .title("🏦 Your Loans")
            .color(0x0034_98DB)
            .fields(embed_fields);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows the repayment schedule of one of your loans.
    #[poise::command(slash_command, prefix_command)]
    pub async fn loan_schedule(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Loan number"]
        #[autocomplete = "autocomplete::autocomplete_active_loan"]
        loan_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let Some(me) = member::get_member_by_user(db, &user_id).await? else {
            ctx.say(NOT_A_MEMBER).await?;
            return Ok(());
        };
        let Some(l) = own_loan(ctx, me.id, loan_id).await? else {
            ctx.say(format!("❌ You have no loan #{loan_id}.")).await?;
            return Ok(());
        };

        let schedule = loan_calculator::generate_payment_schedule(&l);

        let mut table = String::from("```\n #  Due         Payment    Principal  Interest   Balance\n");
        for entry in &schedule {
            writeln!(
                &mut table,
                "{:>2}  {}  {:>9}  {:>9}  {:>9}  {:>9}",
                entry.month,
                entry.date.format("%Y-%m-%d"),
                money::format_amount(entry.payment),
                money::format_amount(entry.principal),
                money::format_amount(entry.interest),
                money::format_amount(entry.balance)
            )?;
        }
        table.push_str("```");

        let embed = serenity::CreateEmbed::default()
            .title(format!(
                "📅 Loan #{} - {} at {}%",
                l.id,
                report::format_money(l.amount()),
                l.interest_rate()
            ))
            .color(0x0034_98DB)
            .description(table);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Records a repayment against one of your disbursed loans.
    #[poise::command(slash_command, prefix_command)]
    pub async fn repay(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Loan number"]
        #[autocomplete = "autocomplete::autocomplete_active_loan"]
        loan_id: i64,
        #[description = "Amount paid"] amount: f64,
        #[description = "How you paid"]
        #[autocomplete = "autocomplete::autocomplete_payment_method"]
        method: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let Some(me) = member::get_member_by_user(db, &user_id).await? else {
            ctx.say(NOT_A_MEMBER).await?;
            return Ok(());
        };
        if own_loan(ctx, me.id, loan_id).await?.is_none() {
            ctx.say(format!("❌ You have no loan #{loan_id}.")).await?;
            return Ok(());
        }
        let Some(method) = PaymentMethod::parse(&method) else {
            ctx.say(format!(
                "❌ Unknown payment method '{method}'. Use mpesa, bank or cash."
            ))
            .await?;
            return Ok(());
        };

        let amount = money::from_f64(amount)?;

        match loan::record_repayment(db, loan_id, amount, method).await {
            Ok(repayment) => {
                let mut message = format!(
                    "✅ Repayment of **{}** recorded (principal {}, interest {}). Reference: `{}`.\n",
                    report::format_money(repayment.payment.amount()),
                    report::format_money(money::from_minor(repayment.payment.principal_minor)),
                    report::format_money(money::from_minor(repayment.payment.interest_minor)),
                    repayment.payment.transaction_ref
                );
                if repayment.loan.status == LoanStatus::Completed {
                    message.push_str("🎉 Your loan is fully repaid!");
                } else {
                    write!(
                        &mut message,
                        "Remaining balance: **{}**",
                        report::format_money(repayment.loan.remaining_balance())
                    )?;
                }
                if repayment.score.change() != 0 {
                    write!(
                        &mut message,
                        "\nCredit score: {} ({})",
                        repayment.score.score,
                        report::format_signed_change(repayment.score.change())
                    )?;
                }
                ctx.say(message).await?;
            }
            Err(e @ (Error::LoanNotRepayable { .. } | Error::InvalidAmount { .. })) => {
                ctx.say(format!("❌ {e}")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
