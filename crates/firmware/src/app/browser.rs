//! SD card listing for FileList (every entry) and MusicList (`.wav` only).

use platform::{DirEntry, Storage};

use super::screen::{clip, format_line, Line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Filter {
    All,
    Wav,
}

impl Filter {
    fn accepts(self, entry: &DirEntry) -> bool {
        match self {
            Self::All => true,
            Self::Wav => entry.is_wav(),
        }
    }
}

/// Position in the card's root directory.
///
/// Entries are fetched one at a time from the card, so nothing but the
/// selected entry is held in memory.
#[derive(Debug, Clone)]
pub struct Browser {
    filter: Filter,
    index: usize,
    selected: Option<DirEntry>,
}

impl Browser {
    pub const fn new(filter: Filter) -> Self {
        Self {
            filter,
            index: 0,
            selected: None,
        }
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn selected(&self) -> Option<&DirEntry> {
        self.selected.as_ref()
    }

    /// Select the first matching entry.
    pub async fn first<S: Storage>(&mut self, filter: Filter, card: &mut S) -> Result<(), S::Error> {
        self.filter = filter;
        self.selected = None;
        if let Some((index, entry)) = self.scan_forward(card, 0).await? {
            self.index = index;
            self.selected = Some(entry);
        }
        Ok(())
    }

    /// Select the next matching entry, wrapping to the first.
    pub async fn next<S: Storage>(&mut self, card: &mut S) -> Result<(), S::Error> {
        if self.selected.is_none() {
            return self.first(self.filter, card).await;
        }
        let found = match self.scan_forward(card, self.index.saturating_add(1)).await? {
            Some(hit) => Some(hit),
            None => self.scan_forward(card, 0).await?,
        };
        if let Some((index, entry)) = found {
            self.index = index;
            self.selected = Some(entry);
        }
        Ok(())
    }

    /// Select the previous matching entry; stays on the first.
    pub async fn prev<S: Storage>(&mut self, card: &mut S) -> Result<(), S::Error> {
        let mut index = self.index;
        while let Some(i) = index.checked_sub(1) {
            index = i;
            if let Some(entry) = card.dir_entry(i).await? {
                if self.filter.accepts(&entry) {
                    self.index = i;
                    self.selected = Some(entry);
                    break;
                }
            }
        }
        Ok(())
    }

    async fn scan_forward<S: Storage>(
        &self,
        card: &mut S,
        from: usize,
    ) -> Result<Option<(usize, DirEntry)>, S::Error> {
        let mut index = from;
        while let Some(entry) = card.dir_entry(index).await? {
            if self.filter.accepts(&entry) {
                return Ok(Some((index, entry)));
            }
            index = index.saturating_add(1);
        }
        Ok(None)
    }

    /// Name on top, size (or `<DIR>`) below.
    pub fn lines(&self) -> (Line, Line) {
        match &self.selected {
            None => (
                clip(match self.filter {
                    Filter::All => "No files",
                    Filter::Wav => "No WAV files",
                }),
                Line::new(),
            ),
            Some(entry) if entry.is_dir => (clip(&entry.name), clip("<DIR>")),
            Some(entry) => (clip(&entry.name), format_line(format_args!("{} B", entry.size))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use platform::mocks::MockCard;

    fn card() -> MockCard {
        let mut card = MockCard::new();
        card.add_file("README.TXT", vec![0; 12]);
        card.add_file("ONE.WAV", vec![0; 44]);
        card.add_file("NOTES.TXT", vec![]);
        card.add_file("TWO.wav", vec![0; 100]);
        card
    }

    #[tokio::test]
    async fn test_wav_filter_skips_other_files() {
        let mut card = card();
        let mut browser = Browser::new(Filter::Wav);
        browser.first(Filter::Wav, &mut card).await.unwrap();
        assert_eq!(browser.selected().unwrap().name.as_str(), "ONE.WAV");
        browser.next(&mut card).await.unwrap();
        assert_eq!(browser.selected().unwrap().name.as_str(), "TWO.wav");
        browser.next(&mut card).await.unwrap();
        assert_eq!(browser.selected().unwrap().name.as_str(), "ONE.WAV", "wraps");
        browser.prev(&mut card).await.unwrap();
        assert_eq!(browser.selected().unwrap().name.as_str(), "ONE.WAV", "stays");
    }

    #[tokio::test]
    async fn test_file_list_shows_sizes() {
        let mut card = card();
        let mut browser = Browser::new(Filter::All);
        browser.first(Filter::All, &mut card).await.unwrap();
        let (top, bottom) = browser.lines();
        assert_eq!(top.as_str(), "README.TXT");
        assert_eq!(bottom.as_str(), "12 B");
        browser.next(&mut card).await.unwrap();
        browser.next(&mut card).await.unwrap();
        browser.prev(&mut card).await.unwrap();
        assert_eq!(browser.selected().unwrap().name.as_str(), "ONE.WAV");
    }

    #[tokio::test]
    async fn test_empty_card() {
        let mut card = MockCard::new();
        let mut browser = Browser::new(Filter::Wav);
        browser.first(Filter::Wav, &mut card).await.unwrap();
        assert!(browser.selected().is_none());
        assert_eq!(browser.lines().0.as_str(), "No WAV files");
    }
}
