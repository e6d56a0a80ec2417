
use utils::*;

///
/// An enum that represents the result of a game from the perspective of the 
/// player to move. The declaration order is the order of the network's 
/// outcome logits.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Outcome 
{
    Win,
    Draw,
    Loss
}

impl std::fmt::Display for Outcome 
{
    fn fmt (& self, f: & mut std::fmt::Formatter<'_>) -> std::fmt::Result 
    {
        match self 
        {
            Outcome::Win  => write!(f, "win"),
            Outcome::Draw => write!(f, "draw"),
            Outcome::Loss => write!(f, "loss")
        }
    }
}

impl Outcome 
{
    ///
    /// The number of outcome classes.
    ///
    pub const COUNT : usize = 3;

    ///
    /// Returns every outcome in logit order.
    ///
    pub fn as_array () -> [Outcome; Outcome::COUNT]
    {
        [Outcome::Win, Outcome::Draw, Outcome::Loss]
    }

    ///
    /// Returns the scalar value of this outcome in [-1, 1].
    ///
    pub fn value (& self) -> f32 
    {
        match self 
        {
            Outcome::Win  =>  1.0,
            Outcome::Draw =>  0.0,
            Outcome::Loss => -1.0
        }
    }
}

#[cfg(test)]
mod tests 
{
    use super::*;

    #[test]
    fn logit_order_is_win_draw_loss ()
    {
        let values : Vec<f32> = Outcome::as_array().iter().map(|o| o.value()).collect();
        assert_eq!(values, vec![1.0, 0.0, -1.0]);
        assert_eq!(format!("{}", Outcome::as_array()[0]), "win");
    }
}
