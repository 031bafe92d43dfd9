use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::MoviesClient;
use serde::Serialize;
use shared::domain::{Director, MovieDraft, MovieId};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    base_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    Get { id: i64 },
    Create(DraftArgs),
    Update {
        id: i64,
        #[command(flatten)]
        draft: DraftArgs,
    },
    Delete { id: i64 },
}

#[derive(Args, Debug)]
struct DraftArgs {
    #[arg(long, default_value = "")]
    isbn: String,
    #[arg(long, default_value = "")]
    title: String,
    #[arg(long, requires = "director_lastname")]
    director_firstname: Option<String>,
    #[arg(long, requires = "director_firstname")]
    director_lastname: Option<String>,
}

impl From<DraftArgs> for MovieDraft {
    fn from(args: DraftArgs) -> Self {
        let director = match (args.director_firstname, args.director_lastname) {
            (Some(firstname), Some(lastname)) => Some(Director::new(firstname, lastname)),
            _ => None,
        };
        MovieDraft {
            isbn: args.isbn,
            title: args.title,
            director,
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = MoviesClient::new(&cli.base_url)
        .with_context(|| format!("cannot use base url '{}'", cli.base_url))?;

    match cli.command {
        Command::List => print_json(&client.list_movies().await?)?,
        Command::Get { id } => match client.get_movie(MovieId(id)).await? {
            Some(movie) => print_json(&movie)?,
            None => anyhow::bail!("movie {id} not found"),
        },
        Command::Create(args) => {
            let movie = client.create_movie(&args.into()).await?;
            print_json(&movie)?;
        }
        Command::Update { id, draft } => {
            let movies = client
                .update_movie(MovieId(id), &draft.into())
                .await?
                .with_context(|| format!("movie {id} not found"))?;
            print_json(&movies)?;
        }
        Command::Delete { id } => {
            client.delete_movie(MovieId(id)).await?;
            println!("deleted movie_id={id}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_update_with_director() {
        let cli = Cli::try_parse_from([
            "tools",
            "update",
            "1",
            "--isbn",
            "000",
            "--title",
            "Changed",
            "--director-firstname",
            "Ann",
            "--director-lastname",
            "Lee",
        ])
        .expect("parse");
        let Command::Update { id, draft } = cli.command else {
            panic!("expected update");
        };
        assert_eq!(id, 1);
        let draft = MovieDraft::from(draft);
        assert_eq!(draft.title, "Changed");
        assert_eq!(draft.director, Some(Director::new("Ann", "Lee")));
        assert_eq!(cli.base_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn director_needs_both_names() {
        let err = Cli::try_parse_from([
            "tools",
            "create",
            "--title",
            "New",
            "--director-firstname",
            "Ann",
        ]);
        assert!(err.is_err());
    }
}
