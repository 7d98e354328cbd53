use afl::fuzz;
use axona::{AnalogSignal, ChannelGroup, Cut, InputEvents, RecordingHeader, SignalKind, Tracking};

const SET: &str = "ADC_fullscale_mv 1500\r\nduration 10\r\ntracked_spots 2\r\n\
                   gain_ch_0 3000\r\ngain_ch_1 3000\r\ngain_ch_2 3000\r\ngain_ch_3 3000\r\n\
                   EEG_ch_1 0\r\nb_in_ch_0 0\r\nref_0 0\r\n";

fn main() {
    let Ok(header) = RecordingHeader::from_text(SET) else {
        return;
    };

    fuzz! {|data: &[u8]|{
        // the first byte picks the decoder
        let Some((&which, data)) = data.split_first() else {
            return;
        };
        match which % 6 {
            0 => { let _ = ChannelGroup::from_bytes(data, 0, 0, &header); }
            1 => { let _ = Tracking::from_bytes(data, header.tracked_spots()); }
            2 => { let _ = AnalogSignal::from_bytes(data, SignalKind::Eeg, 1, &header); }
            3 => { let _ = InputEvents::from_bytes(data); }
            4 => { let _ = Cut::from_text(0, &String::from_utf8_lossy(data)); }
            _ => { let _ = RecordingHeader::from_text(&String::from_utf8_lossy(data)); }
        }
    }
    }
}
