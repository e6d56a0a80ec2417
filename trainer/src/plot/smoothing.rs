
///
/// Moving average over a centred window of `window` samples. Windows that 
/// run past either end are filled by mirroring the series, including the 
/// edge sample (d c b a | a b c d | d c b a).
///
pub fn uniform_window_filter (values: & [f32], window: usize) -> Vec<f32>
{
    let n = values.len() as i64;
    if n == 0 || window <= 1 
    {
        return values.to_vec();
    }

    let reflect = |mut i: i64| -> usize 
    {
        loop 
        {
            if i < 0 
            {
                i = - i - 1;
            }
            else if i >= n 
            {
                i = 2 * n - i - 1;
            }
            else 
            {
                return i as usize;
            }
        }
    };

    let w = window as i64;
    let start = - (w / 2);

    (0 .. n)
        .map(|i| (start .. start + w).map(|o| values[reflect(i + o)]).sum::<f32>() / window as f32)
        .collect()
}
