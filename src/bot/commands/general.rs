//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**SaccoBuddy Help**\n\
        Here is a summary of all available commands for SaccoBuddy.\n\n\
        **Membership**\n\
        • `/register <full_name>` - Joins the SACCO.\n\
        • `/dashboard` - Shows your savings, loans and credit score at a glance.\n\
        • `/credit_score` - Recalculates your score and shows how it is built.\n\n\
        **Savings**\n\
        • `/contribute <amount> <method> [description]` - Records a contribution for confirmation.\n\
        • `/contributions` - Lists your recent contributions.\n\n\
        **Loans**\n\
        • `/loan_eligibility` - Checks whether you can borrow and how much.\n\
        • `/loan_quote <amount> <term>` - Prices a loan and checks affordability.\n\
        • `/apply_loan <amount> <term> <purpose>` - Applies for a loan.\n\
        • `/my_loans` - Lists your loans.\n\
        • `/loan_schedule <loan_id>` - Shows a loan's repayment schedule.\n\
        • `/repay <loan_id> <amount> <method>` - Records a repayment.\n\n\
        **Insurance**\n\
        • `/insurance` - Shows your cover and the tiers open to you.\n\
        • `/subscribe_insurance <tier> [dependents]` - Buys health cover.\n\n\
        **Administration**\n\
        • `/admin <subcommand>` - Confirm contributions, review loans, SACCO overview.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
