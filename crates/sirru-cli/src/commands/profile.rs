use clap::Args;
use serde_json::json;
use sirru_core::pulse::DEFAULT_REGION;
use sirru_core::Profile;

#[derive(Args)]
pub struct ProfileArgs {
    /// Nickname, 2 to 20 characters after trimming
    nickname: String,
    /// Home region code
    #[arg(long, default_value = DEFAULT_REGION)]
    region: String,
}

pub fn run(args: ProfileArgs) -> Result<(), Box<dyn std::error::Error>> {
    let profile = Profile::new(&args.nickname, &args.region)?;
    let out = json!({
        "nickname": profile.nickname,
        "region": profile.region,
        "region_name": profile.region_name(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
