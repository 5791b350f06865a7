use crate::foundation::error::{NovaError, NovaResult};
use crate::session::artifact::ArtifactHandle;
use crate::session::composer::Composer;
use crate::storyboard::input::GeneratorInput;
use crate::storyboard::model::{SceneDescriptor, Storyboard};
use crate::storyboard::synth::{SynthOpts, build_storyboard_with};

/// Request → storyboard → render flow with a selected scene for inspection.
pub struct Studio {
    composer: Composer,
    synth: SynthOpts,
    selected_scene: Option<String>,
}

impl Studio {
    /// Wrap a composer.
    pub fn new(composer: Composer, synth: SynthOpts) -> Self {
        Self {
            composer,
            synth,
            selected_scene: None,
        }
    }

    /// Synthesize a storyboard for `input` and hand it to the composer.
    ///
    /// Selects the first scene. When synthesis fails the previous storyboard is kept.
    pub fn generate(&mut self, input: &GeneratorInput) -> NovaResult<&Storyboard> {
        let board = build_storyboard_with(input, self.synth)?;
        let first = board.scenes.first().map(|s| s.id.clone());
        self.composer.set_storyboard(board, input.aspect_ratio)?;
        self.selected_scene = first;
        self.composer
            .storyboard()
            .ok_or_else(|| NovaError::evaluation("storyboard missing after generation"))
    }

    /// Current storyboard.
    pub fn storyboard(&self) -> Option<&Storyboard> {
        self.composer.storyboard()
    }

    /// Select a scene by id.
    pub fn select_scene(&mut self, id: &str) -> NovaResult<&SceneDescriptor> {
        let board = self
            .composer
            .storyboard()
            .ok_or_else(|| NovaError::invalid_input("no storyboard has been generated"))?;
        let scene = board
            .scene(id)
            .ok_or_else(|| NovaError::invalid_input(format!("unknown scene \"{id}\"")))?;
        self.selected_scene = Some(scene.id.clone());
        Ok(scene)
    }

    /// Selected scene, if any.
    pub fn selected_scene(&self) -> Option<&SceneDescriptor> {
        let id = self.selected_scene.as_deref()?;
        self.composer.storyboard()?.scene(id)
    }

    /// Render the current storyboard to completion.
    pub fn render(&mut self) -> NovaResult<Option<ArtifactHandle>> {
        self.composer.start_rendering()?;
        self.composer.run_to_completion()
    }

    /// The wrapped composer.
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// The wrapped composer, mutably.
    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/studio.rs"]
mod tests;
