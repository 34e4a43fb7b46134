//! Builders for FCP5 test documents

/// One `clipitem` to render
#[derive(Debug, Clone)]
pub struct ClipSpec {
    pub name: String,
    pub timebase: u32,
    pub in_point: i64,
    pub start: i64,
    pub end: i64,
    pub file_id: String,
    pub path: String,
    pub trackindex: u32,
    pub levels: Vec<(i64, f64)>,
}

/// A 2-second clip at 30 fps starting one second into `file_id`
pub fn clip(name: &str, file_id: &str, trackindex: u32) -> ClipSpec {
    ClipSpec {
        name: name.to_string(),
        timebase: 30,
        in_point: 30,
        start: 0,
        end: 60,
        file_id: file_id.to_string(),
        path: format!("file://localhost/media/{}.wav", file_id),
        trackindex,
        levels: Vec::new(),
    }
}

impl ClipSpec {
    pub fn render(&self) -> String {
        let mut out = format!(
            "<clipitem id=\"{name}-item\">\n\
             <name>{name}</name>\n\
             <rate><timebase>{tb}</timebase><ntsc>FALSE</ntsc></rate>\n\
             <in>{in_point}</in>\n\
             <out>{out}</out>\n\
             <start>{start}</start>\n\
             <end>{end}</end>\n\
             <masterclipid>{file}</masterclipid>\n\
             <file id=\"{file}\"><name>{file}.wav</name><pathurl>{path}</pathurl></file>\n\
             <sourcetrack><mediatype>audio</mediatype><trackindex>{ti}</trackindex></sourcetrack>\n",
            name = self.name,
            tb = self.timebase,
            in_point = self.in_point,
            out = self.in_point + (self.end - self.start),
            start = self.start,
            end = self.end,
            file = self.file_id,
            path = self.path,
            ti = self.trackindex,
        );
        if !self.levels.is_empty() {
            out.push_str(
                "<filter><effect><name>Audio Levels</name><effectid>audiolevels</effectid>\
                 <effecttype>audiolevels</effecttype><mediatype>audio</mediatype>\
                 <parameter><parameterid>level</parameterid><name>Level</name>",
            );
            for (when, value) in &self.levels {
                out.push_str(&format!(
                    "<keyframe><when>{}</when><value>{}</value></keyframe>",
                    when, value
                ));
            }
            out.push_str("</parameter></effect></filter>\n");
        }
        out.push_str("</clipitem>\n");
        out
    }
}

pub fn track(clips: &[ClipSpec]) -> String {
    let body: String = clips.iter().map(ClipSpec::render).collect();
    format!("<track>\n{}<enabled>TRUE</enabled>\n</track>\n", body)
}

pub fn sequence(id: &str, name: &str, tracks: &[String]) -> String {
    format!(
        "<sequence id=\"{id}\">\n<name>{name}</name>\n\
         <rate><timebase>30</timebase><ntsc>FALSE</ntsc></rate>\n\
         <media>\n<video><track/></video>\n<audio>\n{tracks}</audio>\n</media>\n</sequence>\n",
        id = id,
        name = name,
        tracks = tracks.concat(),
    )
}

pub fn project(sequences: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE xmeml>\n<xmeml version=\"5\">\n{}</xmeml>\n",
        sequences.concat()
    )
}

/// Project with left/right halves of `take` on tracks 1 and 2 and an
/// unrelated mono clip on track 3
pub fn stereo_pair_and_mono() -> String {
    project(&[sequence(
        "seq-1",
        "Seq",
        &[
            track(&[clip("take", "take", 1)]),
            track(&[clip("take", "take", 2)]),
            track(&[clip("voice", "voice", 1)]),
        ],
    )])
}
