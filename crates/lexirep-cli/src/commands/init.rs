//! The `lexirep init` command.

use anyhow::Result;

use lexirep_core::content::STARTER_WORDS_TOML;

pub fn execute() -> Result<()> {
    if std::path::Path::new("lexirep.toml").exists() {
        println!("lexirep.toml already exists, skipping.");
    } else {
        std::fs::write("lexirep.toml", SAMPLE_CONFIG)?;
        println!("Created lexirep.toml");
    }

    std::fs::create_dir_all("words")?;
    let starter_path = std::path::Path::new("words/starter.toml");
    if starter_path.exists() {
        println!("words/starter.toml already exists, skipping.");
    } else {
        std::fs::write(starter_path, STARTER_WORDS_TOML)?;
        println!("Created words/starter.toml");
    }

    println!("\nNext steps:");
    println!("  1. Add your own word lists under words/");
    println!("  2. Run: lexirep validate");
    println!("  3. Run: lexirep study");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# lexirep configuration

state_file = "lexirep-state.json"
words = "words"

[scheduler]
request_retention = 0.9
maximum_interval = 36500
enable_fuzz = true
# params = [ 21 model weights ]

[session]
max_review = 5
max_new = 5
shuffle = true
"#;
