use crate::field::FieldElement;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nullifier(pub FieldElement);

impl Nullifier {
    pub fn from_fe(fe: FieldElement) -> Self {
        Self(fe)
    }

    pub fn as_fe(&self) -> &FieldElement {
        &self.0
    }
}
