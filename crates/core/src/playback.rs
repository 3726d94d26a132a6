/// Tracks which video is playing so that at most one plays at a time.
#[derive(Debug, Clone)]
pub struct PlaybackCoordinator<K> {
    current: Option<K>,
}

impl<K> Default for PlaybackCoordinator<K> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<K: PartialEq> PlaybackCoordinator<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `id`. Returns the video the caller has to pause, if another one
    /// was playing.
    pub fn play(&mut self, id: K) -> Option<K> {
        if self.current.as_ref() == Some(&id) {
            return None;
        }
        self.current.replace(id)
    }

    pub fn pause(&mut self, id: &K) {
        if self.current.as_ref() == Some(id) {
            self.current = None;
        }
    }

    pub fn ended(&mut self, id: &K) {
        self.pause(id);
    }

    /// Flip `id` between playing and paused. Returns the video to pause when
    /// `id` starts.
    pub fn toggle(&mut self, id: K) -> Option<K> {
        if self.is_playing(&id) {
            self.pause(&id);
            None
        } else {
            self.play(id)
        }
    }

    pub fn is_playing(&self, id: &K) -> bool {
        self.current.as_ref() == Some(id)
    }

    pub fn current(&self) -> Option<&K> {
        self.current.as_ref()
    }
}
