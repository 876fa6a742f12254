//! `lambda-push check` — show what a deploy would target.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use lambda_push_core::{DeploymentTarget, SyncOptions};

use super::TargetArgs;

/// Arguments for `lambda-push check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let (target, options) = self.target.resolve()?;
        print_target(&target, &options);
        Ok(())
    }
}

fn print_target(target: &DeploymentTarget, options: &SyncOptions) {
    let mode = if target.is_code_only() {
        "code only"
    } else {
        "create or update"
    };
    println!("{} ({mode})", target.function_name().as_str().bold());

    if let Some(record) = target.record() {
        let fields = [
            ("handler", record.handler.clone()),
            ("runtime", record.runtime.clone()),
            ("role", record.role.clone()),
            ("memory", record.memory_size.map(|m| format!("{m} MB"))),
            ("timeout", record.timeout.map(|t| format!("{t}s"))),
            ("description", record.description.clone()),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                println!("  {label:<12}{value}");
            }
        }
        if let Some(env) = &record.environment {
            println!("  {:<12}{}", "environment", env.keys().cloned().collect::<Vec<_>>().join(", "));
        }
        if let Some(code) = &record.code {
            println!("  {:<12}s3://{}/{}", "code", code.s3_bucket, code.s3_key);
        }
    }

    println!("  {:<12}{}", "region", options.region);
    if let Some(profile) = &options.profile {
        println!("  {:<12}{profile}", "profile");
    }
    if options.credentials.is_some() {
        println!("  {:<12}explicit", "credentials");
    }
    if let Some(endpoint) = &options.endpoint {
        println!("  {:<12}{endpoint}", "endpoint");
    }
    println!("  {:<12}{}", "publish", target.effective_publish(options));
    if let Some(alias) = &options.alias {
        let name = alias.name.as_str().unwrap_or("<invalid>");
        match &alias.version {
            Some(version) => println!("  {:<12}{name} → {version}", "alias"),
            None => println!("  {:<12}{name} → published version", "alias"),
        }
    }
}
