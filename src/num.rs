use std::hash::{Hash, Hasher};

/// f64 with Eq/Hash over the bit pattern, so number literals can key maps.
/// NaN cannot be written as a literal, so the NaN special case never matters
/// in practice, but equality is still total.
#[derive(Clone, Copy, Debug)]
pub struct JsNumber(pub f64);

impl PartialEq for JsNumber {
  fn eq(&self, other: &Self) -> bool {
    if self.0.is_nan() {
      return other.0.is_nan();
    };
    self.0 == other.0
  }
}

impl Eq for JsNumber {}

impl Hash for JsNumber {
  fn hash<H: Hasher>(&self, state: &mut H) {
    if !self.0.is_nan() {
      self.0.to_bits().hash(state);
    };
  }
}
