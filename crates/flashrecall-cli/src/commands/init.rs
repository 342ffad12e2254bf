//! The `flashrecall init` command.

use std::path::Path;

use anyhow::Result;

use flashrecall_sources::config::CONFIG_FILE_NAME;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new(CONFIG_FILE_NAME), SAMPLE_CONFIG)?;
    write_if_missing(Path::new("stories.json"), SAMPLE_STORIES)?;

    println!("\nNext steps:");
    println!("  1. Add your own stories to stories.json");
    println!("  2. Run: flashrecall validate");
    println!("  3. Run: flashrecall play --difficulty simple");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# flashrecall configuration

# Milliseconds between reveals.
word_delay_ms = 1000

# full_sentence or word_by_word
display_mode = "word_by_word"

# auto_advance, pause_after_each_unit or pause_after_sentence
pause_mode = "auto_advance"

# positional or keywords
score_mode = "positional"

difficulty = "simple"
show_notes = true

# Narrate reveals with an external program.
speech = false
speech_command = "espeak"

# Notes and progress are kept here.
data_dir = "./flashrecall-data"

[source]
type = "file"
path = "stories.json"
"#;

const SAMPLE_STORIES: &str = r#"{
  "simple": [
    {
      "title": "The Red Kite",
      "sentences": [
        "Mia had a red kite.",
        "The wind lifted it over the hill.",
        "She laughed as it danced in the sky."
      ]
    },
    {
      "title": "Morning Bread",
      "sentences": [
        "The baker woke before the sun.",
        "He shaped twelve loaves by hand.",
        "By seven the whole street smelled warm."
      ]
    }
  ],
  "medium": [
    {
      "title": "The Lighthouse Keeper",
      "sentences": [
        "Every night Tomas climbed the one hundred steps of the lighthouse.",
        "He polished the great lens until it shone like water.",
        "When the storm came, a fishing boat followed his light home."
      ]
    }
  ],
  "hard": [
    {
      "title": "The Cartographer",
      "sentences": [
        "Elena spent thirty years mapping a coastline that kept changing.",
        "Each winter the sea carved new coves and buried old beaches under sand.",
        "Her final map showed no coast at all, only arrows marking where the land was going.",
        "The guild called it unfinished; sailors called it the only honest chart they owned."
      ]
    }
  ]
}
"#;
