/// A word list that can't feed the drawer's three options.
#[derive(Debug, thiserror::Error)]
pub enum WordBankError {
    #[error("a word bank needs at least {required} distinct words, got {found}")]
    TooFewWords { required: usize, found: usize },
}
