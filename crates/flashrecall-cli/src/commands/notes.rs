//! The `flashrecall notes` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use flashrecall_core::notes::{annotate_word, Note, NoteBook, UpsertOutcome};
use flashrecall_sources::config::load_config_from;

use crate::NotesCommand;

pub fn execute(command: NotesCommand, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let path = config.notes_path();
    let mut book = NoteBook::load(&path)?;

    match command {
        NotesCommand::List { category } => match category {
            Some(name) => {
                let notes = book
                    .category(&name)
                    .with_context(|| format!("unknown category: {name}"))?;
                print_category(&name, notes);
            }
            None => {
                for (name, notes) in book.categories() {
                    print_category(name, notes);
                }
            }
        },
        NotesCommand::Add {
            word,
            desc,
            category,
        } => {
            match book.upsert(&category, &word, &desc)? {
                UpsertOutcome::Inserted => println!("Added {}", annotate_word(&word, &desc)),
                UpsertOutcome::Updated { previous } => {
                    println!("Updated {word}: '{previous}' -> '{desc}'")
                }
            }
            book.save(&path)?;
        }
        NotesCommand::Remove { word, category } => match book.remove(&category, &word)? {
            Some(note) => {
                book.save(&path)?;
                println!("Removed {}", annotate_word(&note.word, &note.desc));
            }
            None => println!("No note for '{word}' in {category}."),
        },
        NotesCommand::Search { query } => {
            let hits = book.search(&query);
            if hits.is_empty() {
                println!("No notes match '{query}'.");
            }
            for (category, note) in hits {
                println!("[{category}] {}", annotate_word(&note.word, &note.desc));
            }
        }
        NotesCommand::Category { name } => {
            if book.add_category(&name)? {
                book.save(&path)?;
                println!("Created category {}", name.trim());
            } else {
                println!("Category {} already exists.", name.trim());
            }
        }
        NotesCommand::Export { output } => {
            let json = book.export_json()?;
            match output {
                Some(out) => {
                    std::fs::write(&out, json)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                    println!("Exported {} note(s) to {}", book.note_count(), out.display());
                }
                None => println!("{json}"),
            }
        }
        NotesCommand::Import { path: source } => {
            let content = std::fs::read_to_string(&source)
                .with_context(|| format!("failed to read {}", source.display()))?;
            let imported = NoteBook::import_json(&content)
                .with_context(|| format!("in {}", source.display()))?;
            imported.save(&path)?;
            println!(
                "Imported {} note(s) in {} categories.",
                imported.note_count(),
                imported.categories().count()
            );
        }
    }

    Ok(())
}

fn print_category(name: &str, notes: &[Note]) {
    println!("{name} ({})", notes.len());
    for note in notes {
        println!("  {}: {}", note.word, note.desc);
    }
}
