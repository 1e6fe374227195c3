//! Member Discord commands - registration, dashboard, credit score and savings.
//!
//! Each command resolves the caller's membership from their Discord user id and then
//! calls into the core modules.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            contribution, credit_score as scoring, member, money, report, store::MemberSnapshot,
        },
        entities::{PaymentMethod, PaymentStatus},
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Number of score changes listed by `/credit_score`
    const SCORE_HISTORY_LIMIT: u64 = 12;
    /// Number of contributions listed by `/contributions`
    const CONTRIBUTION_LIST_LIMIT: usize = 10;

    /// Registers you as a SACCO member.
    #[poise::command(slash_command, prefix_command)]
    pub async fn register(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Your full name as it should appear on SACCO records"] full_name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        match member::register_member(db, &user_id, &full_name).await {
            Ok(new_member) => {
                ctx.say(format!(
                    "🎉 Welcome to the SACCO, **{}**! Your membership number is `{}`.\n\
                     Your starting credit score is **{}**. Make regular contributions with \
                     `/contribute` to build it up.",
                    new_member.full_name,
                    new_member.membership_number(),
                    new_member.credit_score
                ))
                .await?;
            }
            Err(Error::MemberAlreadyRegistered { .. }) => {
                ctx.say("⚠️ You are already a registered member. Use `/dashboard` to see your account.")
                    .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Shows your savings, loans and credit score at a glance.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dashboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let Some(me) = member::get_member_by_user(db, &user_id).await? else {
            ctx.say("❌ You are not a member yet. Use `/register` to join.")
                .await?;
            return Ok(());
        };

        let summary = report::generate_member_report(db, me.id).await?;

        let mut score_value = String::new();
        writeln!(
            &mut score_value,
            "{}",
            report::format_score_gauge(summary.credit_score, None)
        )?;
        write!(
            &mut score_value,
            "**{}** - {}",
            summary.category.label(),
            summary.category.description()
        )?;

        let mut savings_value = String::new();
        writeln!(
            &mut savings_value,
            "**Total:** {}",
            report::format_money(summary.total_savings)
        )?;
        write!(
            &mut savings_value,
            "**Months contributed:** {}",
            summary.contribution_months
        )?;

        let mut loans_value = String::new();
        if summary.active_loans.is_empty() {
            loans_value.push_str("No active loans");
        } else {
            writeln!(
                &mut loans_value,
                "**Active loans:** {}",
                summary.active_loans.len()
            )?;
            writeln!(
                &mut loans_value,
                "**Outstanding:** {}",
                report::format_money(summary.outstanding_balance)
            )?;
            if let Some(next) = summary.next_payment {
                write!(
                    &mut loans_value,
                    "**Next instalment:** {}",
                    report::format_money(next)
                )?;
            }
        }

        let history_value = if summary.recent_changes.is_empty() {
            "No score changes yet".to_string()
        } else {
            summary
                .recent_changes
                .iter()
                .map(report::format_history_entry)
                .collect::<Vec<_>>()
                .join("\n")
        };

        let embed = serenity::CreateEmbed::default()
            .title(format!("📊 {}", summary.member.full_name))
            .description(format!(
                "Member `{}` since {}",
                summary.member.membership_number(),
                summary.member.join_date.format("%Y-%m-%d")
            ))
            .color(summary.category.embed_color())
            .field("Credit Score", score_value, false)
            .field("Savings", savings_value, true)
            .field("Loans", loans_value, true)
            .field("Recent Score Changes", history_value, false);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Recalculates your credit score and shows how it is built.
    #[poise::command(slash_command, prefix_command)]
    pub async fn credit_score(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let Some(me) = member::get_member_by_user(db, &user_id).await? else {
            ctx.say("❌ You are not a member yet. Use `/register` to join.")
                .await?;
            return Ok(());
        };

        let update = scoring::update_score(db, me.id, "Credit score check").await?;
        let Some(snapshot) = MemberSnapshot::load(db, me.id).await? else {
            return Err(Error::MemberNotFound {
                id: me.id.to_string(),
            });
        };

        let breakdown = scoring::score_breakdown(
            &snapshot.member,
            &snapshot.contributions,
            &snapshot.loans,
            &snapshot.payments,
            Utc::now(),
        );
        let category = scoring::ScoreCategory::from_score(update.score);

        let mut factors = String::new();
        writeln!(&mut factors, "Base score: **{}**", scoring::BASE_SCORE)?;
        writeln!(
            &mut factors,
            "Contribution consistency: **{}**",
            report::format_signed_change(breakdown.contribution)
        )?;
        writeln!(
            &mut factors,
            "Repayment history: **{}**",
            report::format_signed_change(breakdown.repayment)
        )?;
        writeln!(
            &mut factors,
            "Membership tenure: **{}**",
            report::format_signed_change(breakdown.tenure)
        )?;
        write!(
            &mut factors,
            "Debt-to-savings: **{}**",
            report::format_signed_change(breakdown.debt_ratio)
        )?;

        let history = scoring::score_history(db, me.id, SCORE_HISTORY_LIMIT).await?;
        let history_value = if history.is_empty() {
            "No score changes yet".to_string()
        } else {
            history
                .iter()
                .map(report::format_history_entry)
                .collect::<Vec<_>>()
                .join("\n")
        };

        let change_line = if update.change() == 0 {
            "No change since your last check".to_string()
        } else {
            format!(
                "Changed {} since your last check",
                report::format_signed_change(update.change())
            )
        };

        let embed = serenity::CreateEmbed::default()
            .title("💳 Credit Score")
            .description(format!(
                "{}\n**{}** ({}) - {}\n{change_line}",
                report::format_score_gauge(update.score, None),
                category.label(),
                category.color(),
                category.description()
            ))
            .color(category.embed_color())
            .field("Score Factors", factors, false)
            .field("History", history_value, false);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Records a savings contribution. It counts once an administrator confirms it.
    #[poise::command(slash_command, prefix_command)]
    pub async fn contribute(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Amount contributed (e.g., 2500)"] amount: f64,
        #[description = "How you paid"]
        #[autocomplete = "autocomplete::autocomplete_payment_method"]
        method: String,
        #[description = "Optional note"] description: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();
        let limits = &ctx.data().config.lending;

        let Some(me) = member::get_member_by_user(db, &user_id).await? else {
            ctx.say("❌ You are not a member yet. Use `/register` to join.")
                .await?;
            return Ok(());
        };

        let Some(method) = PaymentMethod::parse(&method) else {
            ctx.say(format!(
                "❌ Unknown payment method '{method}'. Use mpesa, bank or cash."
            ))
            .await?;
            return Ok(());
        };

        let amount = money::from_f64(amount)?;

        match contribution::record_contribution(db, me.id, amount, method, description, limits)
            .await
        {
            Ok(recorded) => {
                ctx.say(format!(
                    "✅ Contribution of **{} {}** via {} recorded.\n\
                     Reference: `{}`. It will count toward your savings once confirmed.",
                    limits.currency,
                    money::format_amount(recorded.amount()),
                    recorded.method,
                    recorded.transaction_ref
                ))
                .await?;
            }
            Err(Error::InvalidAmount { .. }) => {
                ctx.say(format!(
                    "❌ The minimum contribution is {} {}.",
                    limits.currency,
                    money::format_amount(limits.min_contribution)
                ))
                .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Lists your most recent contributions.
    #[poise::command(slash_command, prefix_command)]
    pub async fn contributions(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let me = member::require_member_by_user(db, &user_id).await?;
        let records = contribution::get_contributions_for_member(db, me.id).await?;

        if records.is_empty() {
            ctx.say("You have no contributions yet. Use `/contribute` to make one!")
                .await?;
            return Ok(());
        }

        let mut lines = String::new();
        for record in records.iter().take(CONTRIBUTION_LIST_LIMIT) {
            let status_emoji = match record.status {
                PaymentStatus::Completed => "✅",
                PaymentStatus::Pending => "⏳",
                PaymentStatus::Failed => "❌",
            };
            writeln!(
                &mut lines,
                "{status_emoji} `#{}` {} - {} via {} ({})",
                record.id,
                record.date.format("%Y-%m-%d"),
                report::format_money(record.amount()),
                record.method,
                record.status
            )?;
        }

        let embed = serenity::CreateEmbed::default()
            .title("💰 Your Contributions")
            .color(0x002E_CC71)
            .description(lines);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
