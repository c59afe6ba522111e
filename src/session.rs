//! Interactive [`Session`]: collect ingredients, generate a recipe, show it,
//! optionally save it, repeat.

use std::{
    io::{self, Write},
    ops::ControlFlow,
};

use crate::{
    client::Generate,
    generation::GenerationResult,
    prompt::{self, Ingredients, Preferences},
    Store,
};

mod console;
pub use console::{Console, Input, Stdin};

/// Result type for the session. See also [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Unexpected failure during an iteration. The session reports it and starts
/// over with a fresh ingredient list.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Why a [`Session`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Termination {
    /// The user chose not to generate another recipe.
    Declined,
    /// The user pressed Ctrl-C.
    Interrupted,
    /// Input ran out.
    Closed,
}

/// Where a [`Session`] is in its loop. Each state carries the data the next
/// phase needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// Reading ingredients until a blank line.
    CollectingIngredients,
    /// Reading the two optional preferences.
    CollectingPreferences {
        #[allow(missing_docs)]
        ingredients: Ingredients,
    },
    /// Building the prompt and calling the model.
    Generating {
        #[allow(missing_docs)]
        ingredients: Ingredients,
        #[allow(missing_docs)]
        preferences: Preferences,
    },
    /// Showing the outcome.
    Displaying {
        #[allow(missing_docs)]
        result: GenerationResult,
    },
    /// Offering to save a successful outcome.
    Persisting {
        #[allow(missing_docs)]
        result: GenerationResult,
    },
    /// Asking whether to go again.
    AskContinue,
    /// Done.
    Terminated {
        #[allow(missing_docs)]
        reason: Termination,
    },
}

/// Returns true for "y" or "yes", ignoring case and surrounding whitespace.
pub fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

// Read a line, or return the termination from the enclosing phase.
macro_rules! read_or_break {
    ($session:expr, $prompt:expr) => {
        match $session.read($prompt).await? {
            ControlFlow::Continue(line) => line,
            ControlFlow::Break(reason) => return Ok(ControlFlow::Break(reason)),
        }
    };
}

/// Width of the rule around a displayed recipe.
const BANNER_WIDTH: usize = 60;
/// Width of the rule before the "another?" question.
const DIVIDER_WIDTH: usize = 40;

/// An interactive session.
///
/// `G` generates text, `C` supplies input lines and `W` receives everything
/// shown to the user.
pub struct Session<G, C, W> {
    generator: G,
    console: C,
    out: W,
    store: Store,
}

impl<G, C, W> Session<G, C, W>
where
    G: Generate,
    C: Console,
    W: Write,
{
    /// Farewell shown after Ctrl-C.
    pub const FAREWELL: &'static str = "Thanks for using souschef!";

    /// Create a session.
    pub fn new(generator: G, console: C, out: W, store: Store) -> Self {
        Self {
            generator,
            console,
            out,
            store,
        }
    }

    /// The generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// The output sink.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Run until the user stops, input closes or Ctrl-C is pressed.
    ///
    /// Errors inside an iteration are reported and the loop starts over. An
    /// error is only returned if the output itself cannot be written while
    /// greeting, reporting or saying goodbye.
    pub async fn run(&mut self) -> Result<Termination> {
        writeln!(self.out, "Welcome to souschef!")?;
        writeln!(
            self.out,
            "Generate recipes from your ingredients using Google's Gemini models."
        )?;

        let mut state = State::CollectingIngredients;
        let reason = loop {
            state = match self.step(state).await {
                Ok(State::Terminated { reason }) => break reason,
                Ok(next) => next,
                Err(error) => {
                    #[cfg(feature = "log")]
                    log::error!("Session iteration failed: {}", error);

                    writeln!(self.out, "Unexpected error: {}", error)?;
                    State::CollectingIngredients
                }
            };
        };

        #[cfg(feature = "log")]
        log::info!("Session ended: {:?}", reason);

        if reason.is_interrupted() {
            writeln!(self.out, "\n\n{}", Self::FAREWELL)?;
        }
        writeln!(self.out, "Happy cooking!")?;
        self.out.flush()?;

        Ok(reason)
    }

    /// Run one phase and return the next [`State`].
    pub async fn step(&mut self, state: State) -> Result<State> {
        Ok(match state {
            State::CollectingIngredients => {
                match self.collect_ingredients().await? {
                    ControlFlow::Continue(ingredients) => {
                        State::CollectingPreferences { ingredients }
                    }
                    ControlFlow::Break(reason) => State::Terminated { reason },
                }
            }
            State::CollectingPreferences { ingredients } => {
                match self.collect_preferences().await? {
                    ControlFlow::Continue(preferences) => State::Generating {
                        ingredients,
                        preferences,
                    },
                    ControlFlow::Break(reason) => State::Terminated { reason },
                }
            }
            State::Generating {
                ingredients,
                preferences,
            } => match self.generate(ingredients, preferences).await? {
                ControlFlow::Continue(result) => State::Displaying { result },
                ControlFlow::Break(reason) => State::Terminated { reason },
            },
            State::Displaying { result } => {
                self.display(&result)?;
                if result.outcome().is_success() {
                    State::Persisting { result }
                } else {
                    State::AskContinue
                }
            }
            State::Persisting { result } => match self.persist(&result).await? {
                ControlFlow::Continue(()) => State::AskContinue,
                ControlFlow::Break(reason) => State::Terminated { reason },
            },
            State::AskContinue => match self.ask_continue().await? {
                ControlFlow::Continue(()) => State::CollectingIngredients,
                ControlFlow::Break(reason) => State::Terminated { reason },
            },
            State::Terminated { reason } => State::Terminated { reason },
        })
    }

    /// Read ingredients, one per line. A blank line ends the list once it has
    /// at least one entry.
    pub async fn collect_ingredients(
        &mut self,
    ) -> Result<ControlFlow<Termination, Ingredients>> {
        writeln!(self.out, "\n=== souschef ===")?;
        writeln!(
            self.out,
            "Enter your ingredients (one per line, press Enter on an empty \
             line when done):"
        )?;

        let mut ingredients = Ingredients::new();
        loop {
            let line = read_or_break!(self, "Ingredient: ");
            if ingredients.push(&line) {
                continue;
            }

            if ingredients.is_empty() {
                writeln!(self.out, "Please enter at least one ingredient.")?;
            } else {
                return Ok(ControlFlow::Continue(ingredients));
            }
        }
    }

    /// Read the dietary restriction and cuisine. Both may be empty.
    pub async fn collect_preferences(
        &mut self,
    ) -> Result<ControlFlow<Termination, Preferences>> {
        writeln!(self.out, "\n--- Additional Preferences (optional) ---")?;
        let dietary = read_or_break!(
            self,
            "Any dietary restrictions? (vegetarian, vegan, gluten-free, etc.): "
        );
        let cuisine = read_or_break!(
            self,
            "Preferred cuisine type? (Italian, Indian, Mexican, etc.): "
        );

        Ok(ControlFlow::Continue(Preferences::new(dietary, cuisine)))
    }

    /// Build the prompt and ask the generator. Generation failures end up in
    /// the result's [`Outcome`], not in the returned error.
    ///
    /// The request is abandoned if the console reports an interruption while
    /// it is in flight.
    ///
    /// [`Outcome`]: crate::Outcome
    pub async fn generate(
        &mut self,
        ingredients: Ingredients,
        preferences: Preferences,
    ) -> Result<ControlFlow<Termination, GenerationResult>> {
        let prompt = prompt::build(&ingredients, &preferences);

        writeln!(self.out, "\nGenerating recipe...")?;
        self.out.flush()?;

        let outcome = tokio::select! {
            outcome = self.generator.generate(&prompt) => Some(outcome),
            signal = self.console.interrupted() => {
                signal?;
                None
            }
        };

        Ok(match outcome {
            Some(outcome) => ControlFlow::Continue(GenerationResult::new(
                ingredients,
                preferences,
                outcome,
            )),
            None => {
                #[cfg(feature = "log")]
                log::info!("Generation interrupted");

                ControlFlow::Break(Termination::Interrupted)
            }
        })
    }

    /// Show the recipe, or the error message.
    pub fn display(&mut self, result: &GenerationResult) -> Result<()> {
        let rule = "=".repeat(BANNER_WIDTH);

        writeln!(self.out, "\n{rule}")?;
        writeln!(self.out, "YOUR GENERATED RECIPE")?;
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "{}", result.outcome())?;
        writeln!(self.out, "{rule}")?;

        Ok(())
    }

    /// Offer to save `result` and save it if the user agrees. A failed save is
    /// reported but does not end the session.
    pub async fn persist(
        &mut self,
        result: &GenerationResult,
    ) -> Result<ControlFlow<Termination>> {
        let answer = read_or_break!(self, "\nSave this recipe? (y/n): ");
        if !is_yes(&answer) {
            return Ok(ControlFlow::Continue(()));
        }

        match self.store.save(result) {
            Ok(path) => {
                writeln!(self.out, "Recipe saved to: {}", path.display())?
            }
            Err(error) => {
                #[cfg(feature = "log")]
                log::warn!("Saving failed: {}", error);

                writeln!(self.out, "Error saving recipe: {}", error)?
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    /// Ask whether to generate another recipe.
    pub async fn ask_continue(&mut self) -> Result<ControlFlow<Termination>> {
        writeln!(self.out, "\n{}", "-".repeat(DIVIDER_WIDTH))?;
        let answer = read_or_break!(self, "Generate another recipe? (y/n): ");

        Ok(if is_yes(&answer) {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(Termination::Declined)
        })
    }

    /// Show `prompt` and read a line.
    async fn read(
        &mut self,
        prompt: &str,
    ) -> Result<ControlFlow<Termination, String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;

        Ok(match self.console.read_line().await? {
            Input::Line(line) => ControlFlow::Continue(line),
            Input::Interrupted => ControlFlow::Break(Termination::Interrupted),
            Input::Closed => ControlFlow::Break(Termination::Closed),
        })
    }
}
