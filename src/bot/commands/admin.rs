//! Administrator Discord commands - contribution confirmation, loan review and the
//! SACCO overview.
//!
//! Every subcommand checks the caller against `SACCO_ADMIN_IDS` before doing anything.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        config::admins,
        core::{contribution, loan, member, report},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    fn require_admin(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        if admins::is_admin(&ctx.author().id.to_string()) {
            Ok(())
        } else {
            Err(Error::NotAdmin)
        }
    }

    /// Parent command for SACCO administration.
    #[poise::command(
        slash_command,
        subcommands(
            "admin_pending",
            "admin_confirm",
            "admin_fail",
            "admin_approve",
            "admin_reject",
            "admin_disburse",
            "admin_overview"
        )
    )]
    pub async fn admin(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "SACCO administration. Available subcommands:\n\
            `/admin pending` - List contributions and loans awaiting review\n\
            `/admin confirm` - Confirm a contribution\n\
            `/admin fail` - Mark a contribution as failed\n\
            `/admin approve` - Approve a loan application\n\
            `/admin reject` - Reject a loan application\n\
            `/admin disburse` - Mark an approved loan as paid out\n\
            `/admin overview` - SACCO-wide statistics";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Lists contributions and loan applications awaiting review.
    #[poise::command(slash_command, rename = "pending")]
    pub async fn admin_pending(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        require_admin(ctx)?;
        let db = &ctx.data().database;

        let contributions = contribution::get_pending_contributions(db).await?;
        let loans = loan::get_pending_loans(db).await?;

        let mut contribution_lines = String::new();
        for c in contributions.iter().take(15) {
            writeln!(
                &mut contribution_lines,
                "`#{}` member {} - {} via {} ({})",
                c.id,
                c.member_id,
                report::format_money(c.amount()),
                c.method,
                c.transaction_ref
            )?;
        }
        if contribution_lines.is_empty() {
            contribution_lines.push_str("None");
        }

        let mut loan_lines = String::new();
        for l in loans.iter().take(15) {
            let name = member::get_member_by_id(db, l.member_id)
                .await?
                .map_or_else(|| format!("member {}", l.member_id), |m| m.full_name);
            writeln!(
                &mut loan_lines,
                "`#{}` {name} - {} over {} months at {}%: {}",
                l.id,
                report::format_money(l.amount()),
                l.term,
                l.interest_rate(),
                l.purpose
            )?;
        }
        if loan_lines.is_empty() {
            loan_lines.push_str("None");
        }

        let embed = serenity::CreateEmbed::default()
            .title("🗂️ Pending Review")
            .color(0x00F3_9C12)
            .field(
                format!("Contributions ({})", contributions.len()),
                contribution_lines,
                false,
            )
            .field(format!("Loan applications ({})", loans.len()), loan_lines, false);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Confirms a pending contribution so it counts toward the member's savings.
    #[poise::command(slash_command, rename = "confirm")]
    pub async fn admin_confirm(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Contribution number"] contribution_id: i64,
    ) -> Result<()> {
        require_admin(ctx)?;
        let db = &ctx.data().database;

        match contribution::confirm_contribution(db, contribution_id).await {
            Ok((confirmed, update)) => {
                ctx.say(format!(
                    "✅ Contribution `#{}` of {} confirmed. Member score: {} ({}).",
                    confirmed.id,
                    report::format_money(confirmed.amount()),
                    update.score,
                    report::format_signed_change(update.change())
                ))
                .await?;
            }
            Err(
                e @ (Error::ContributionNotFound { .. }
                | Error::ContributionAlreadySettled { .. }),
            ) => {
                ctx.say(format!("❌ {e}")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Marks a pending contribution as failed.
    #[poise::command(slash_command, rename = "fail")]
    pub async fn admin_fail(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Contribution number"] contribution_id: i64,
    ) -> Result<()> {
        require_admin(ctx)?;
        let db = &ctx.data().database;

        match contribution::fail_contribution(db, contribution_id).await {
            Ok(failed) => {
                ctx.say(format!(
                    "⚠️ Contribution `#{}` ({}) marked as failed.",
                    failed.id, failed.transaction_ref
                ))
                .await?;
            }
            Err(
                e @ (Error::ContributionNotFound { .. }
                | Error::ContributionAlreadySettled { .. }),
            ) => {
                ctx.say(format!("❌ {e}")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Approves a pending loan application.
    #[poise::command(slash_command, rename = "approve")]
    pub async fn admin_approve(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Loan number"] loan_id: i64,
    ) -> Result<()> {
        require_admin(ctx)?;
        let db = &ctx.data().database;

        match loan::approve_loan(db, loan_id).await {
            Ok(approved) => {
                ctx.say(format!(
                    "👍 Loan `#{}` for {} approved. Use `/admin disburse` once the money is sent.",
                    approved.id,
                    report::format_money(approved.amount())
                ))
                .await?;
            }
            Err(e @ (Error::LoanNotFound { .. } | Error::InvalidLoanTransition { .. })) => {
                ctx.say(format!("❌ {e}")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Rejects a pending loan application. Rejections lower the member's credit score.
    #[poise::command(slash_command, rename = "reject")]
    pub async fn admin_reject(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Loan number"] loan_id: i64,
    ) -> Result<()> {
        require_admin(ctx)?;
        let db = &ctx.data().database;

        match loan::reject_loan(db, loan_id).await {
            Ok((rejected, update)) => {
                ctx.say(format!(
                    "🚫 Loan `#{}` rejected. Member score: {} ({}).",
                    rejected.id,
                    update.score,
                    report::format_signed_change(update.change())
                ))
                .await?;
            }
            Err(e @ (Error::LoanNotFound { .. } | Error::InvalidLoanTransition { .. })) => {
                ctx.say(format!("❌ {e}")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Marks an approved loan as paid out. Repayments start a month later.
    #[poise::command(slash_command, rename = "disburse")]
    pub async fn admin_disburse(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Loan number"] loan_id: i64,
    ) -> Result<()> {
        require_admin(ctx)?;
        let db = &ctx.data().database;

        match loan::disburse_loan(db, loan_id).await {
            Ok(disbursed) => {
                let first_due = disbursed
                    .next_payment_date
                    .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string());
                ctx.say(format!(
                    "💸 Loan `#{}` disbursed. First instalment of {} due {first_due}.",
                    disbursed.id,
                    report::format_money(disbursed.monthly_payment())
                ))
                .await?;
            }
            Err(e @ (Error::LoanNotFound { .. } | Error::InvalidLoanTransition { .. })) => {
                ctx.say(format!("❌ {e}")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Shows SACCO-wide statistics.
    #[poise::command(slash_command, rename = "overview")]
    pub async fn admin_overview(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        require_admin(ctx)?;
        let db = &ctx.data().database;

        let overview = report::generate_sacco_overview(db).await?;

        let embed = serenity::CreateEmbed::default()
            .title("📈 SACCO Overview")
            .color(0x0058_65F2)
            .field("Members", overview.member_count.to_string(), true)
            .field(
                "Total savings",
                report::format_money(overview.total_savings),
                true,
            )
            .field(
                "Active loan book",
                report::format_money(overview.active_loan_book),
                true,
            )
            .field(
                "Pending applications",
                overview.pending_applications.to_string(),
                true,
            )
            .field("Default rate", format!("{}%", overview.default_rate), true);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
