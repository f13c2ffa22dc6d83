// -------------------------------------------------------------------------------------------------

/// Copy the given interleaved buffer into a planar one, starting at frame `offset` of the planar
/// channels. The planar buffer's layout defines the interleaved buffer's channel layout.
pub fn interleaved_to_planar_at(interleaved: &[f32], planar: &mut [Vec<f32>], offset: usize) {
    let channel_count = planar.len();
    let frame_count = interleaved.len() / channel_count;
    match channel_count {
        1 => {
            planar[0][offset..offset + frame_count].copy_from_slice(&interleaved[..frame_count]);
        }
        2 => {
            let (left, right) = planar.split_at_mut(1);
            let left = &mut left[0][offset..offset + frame_count];
            let right = &mut right[0][offset..offset + frame_count];
            for ((l, r), frame) in left
                .iter_mut()
                .zip(right.iter_mut())
                .zip(interleaved.chunks_exact(2))
            {
                *l = frame[0];
                *r = frame[1];
            }
        }
        _ => {
            for (channel_index, channel_values) in planar.iter_mut().enumerate() {
                let channel_values = &mut channel_values[offset..offset + frame_count];
                for (frame_index, value) in channel_values.iter_mut().enumerate() {
                    *value = interleaved[frame_index * channel_count + channel_index];
                }
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Move the first `len` frames of all planar channels `count` frames towards the start.
/// The frames before `count` get dropped.
pub fn shift_planar(planar: &mut [Vec<f32>], count: usize, len: usize) {
    debug_assert!(count <= len);
    if count == 0 {
        return;
    }
    for channel in planar.iter_mut() {
        channel.copy_within(count..len, 0);
    }
}

// -------------------------------------------------------------------------------------------------
