//! Curated deny lists and their overrides
//!
//! Each list is a comma-separated string of plain substrings. Lists are
//! data: callers may replace or extend them before building a firewall.

use serde::{Deserialize, Serialize};

/// User-agent substrings blocked by default
pub const DEFAULT_USER_AGENTS: &str = "Gecko/2009032609 Firefox, ADSARobot, ah-ha, almaden, aktuelles, Anarchie, amzn_assoc, \
    ASPSeek, ASSORT, ATHENS, Atomz, autoemailspider, BackWeb, Bandit, BatchFTP, bdfetch, \
    big.brother, BlackWidow, bmclient, Boston Project, BravoBrian SpiderEngine MarcoPolo, \
    Bot mailto:craftbot@yahoo.com, Buddy, Bullseye, bumblebee, capture, CherryPicker, \
    ChinaClaw, CICC, clipping, Collector, Copier, Crescent, Crescent Internet ToolPak, \
    Custo, cyberalert, DA$, Deweb, diagem, Digger, Digimarc, DIIbot, DISCo, DISCo Pump, \
    DISCoFinder, Download Demon, Download Wonder, Downloader, Drip, DSurf15a, DTS.Agent, \
    EasyDL, eCatch, ecollector, efp@gmx.net, Email Extractor, EirGrabber, EmailCollector, \
    EmailSiphon, EmailWolf, Express WebPictures, ExtractorPro, EyeNetIE, FavOrg, \
    fastlwspider, Favorites Sweeper, FEZhead, FileHound, FlashGet WebWasher, FlickBot, \
    fluffy, FrontPage, GalaxyBot, Generic, Getleft, GetRight, GetSmart, GetWeb!, \
    GetWebPage, gigabaz, Girafabot, Go!Zilla, Go-Ahead-Got-It, GornKer, gotit, Grabber, \
    GrabNet, Grafula, Green Research, grub-client, Harvest, hhjhj@yahoo, hloader, HMView, \
    HomePageSearch, http generic, HTTrack, httpdown, httrack, ia_archiver, IBM_Planetwide, \
    Image Stripper, Image Sucker, imagefetch, IncyWincy, Indy*Library, Indy Library, \
    informant, Ingelin, InterGET, Internet Ninja, InternetLinkagent, InternetSeer.com, \
    Iria, Irvine, JBH*agent, JetCar, JOC, JOC Web Spider, JustView, KWebGet, Lachesis, \
    larbin, LeechFTP, LexiBot, lftp, libwww, likse, Link*Sleuth, LINKS ARoMATIZED, \
    LinkWalker, LWP, lwp-trivial, Mag-Net, Magnet, Mac Finder, Mass Downloader, MCspider, \
    Memo, Microsoft.URL, MIDown tool, Mirror, Missigua Locator, Mister PiX, \
    MMMtoCrawl/UrlDispatcherLLL, ^Mozilla$, Mozilla.*Indy, Mozilla.*NEWT, \
    Mozilla*MSIECrawler, MS FrontPage*, MSFrontPage, MSIECrawler, MSProxy, multithreaddb, \
    nationaldirectory, Navroad, NearSite, NetAnts, NetCarta, NetMechanic, netprospector, \
    NetResearchServer, NetSpider, Net Vampire, NetZIP, NetZip Downloader, NetZippy, NEWT, \
    NICErsPRO, Ninja, NPBot, Octopus, Offline Explorer, Offline Navigator, OpaL, Openfind, \
    OpenTextSiteCrawler, PageGrabber, Papa Foto, PackRat, pavuk, pcBrowser, PersonaPilot, \
    PingALink, Pockey, psbot, PSurf, puf, Pump, PushSite, QRVA, RealDownload, Reaper, \
    Recorder, ReGet, replacer, RepoMonkey, Robozilla, Rover, RPT-HTTPClient, Rsync, \
    Scooter, SearchExpress, searchhippo, searchterms.it, Second Street Research, Seeker, \
    Shai, Siphon, sitecheck, sitecheck.internetseer.com, SiteSnagger, SlySearch, \
    SmartDownload, snagger, Snake, SpaceBison, Spegla, SpiderBot, sproose, SqWorm, \
    Stripper, Sucker, SuperBot, SuperHTTP, Surfbot, SurfWalker, Szukacz, tAkeOut, \
    tarspider, Teleport Pro, Templeton, TrueRobot, TV33_Mercator, UIowaCrawler, UtilMind, \
    URLSpiderPro, URL_Spider_Pro, Vacuum, vagabondo, vayala, visibilitygap, VoidEYE, \
    vspider, Web Downloader, w3mir, Web Data Extractor, Web Image Collector, Web Sucker, \
    Wweb, WebAuto, WebBandit, web.by.mail, Webclipping, webcollage, webcollector, \
    WebCopier, webcraft@bea, webdevil, webdownloader, Webdup, WebEMailExtrac, WebFetch, \
    WebGo IS, WebHook, Webinator, WebLeacher, WEBMASTERS, WebMiner, WebMirror, webmole, \
    WebReaper, WebSauger, Website, Website eXtractor, Website Quester, WebSnake, Webster, \
    WebStripper, websucker, webvac, webwalk, webweasel, WebWhacker, WebZIP, Whacker, \
    whizbang, WhosTalking, Widow, WISEbot, WWWOFFLE, x-Tractor, ^Xaldon WebSpider, WUMPUS, \
    Xenu, XGET, Zeus.*Webster, Zeus, c99, shell, remoteview, base64_, bin/bash, disconnect, \
    eval, lwp-download, unserialize, 360Spider, acapbot, acoonbot, alexibot, asterias, \
    attackbot, backdorbot, becomebot, binlar, blackwidow, blekkobot, blexbot, blowfish, \
    bullseye, bunnys, butterfly, careerbot, casper, checkpriv, cheesebot, cherrypick, \
    chinaclaw, choppy, clshttp, cmsworld, copernic, copyrightcheck, cosmos, crescent, \
    cy_cho, datacha, demon, diavol, discobot, dittospyder, dotbot, dotnetdotcom, dumbot, \
    emailcollector, emailsiphon, emailwolf, extract, eyenetie, feedfinder, flaming, \
    flashget, flicky, foobot, g00g1e, getright, gigabot, go-ahead-got, gozilla, grabnet, \
    grafula, harvest, heritrix, icarus6j, jetbot, jetcar, jikespider, kmccrew, leechftp, \
    libweb, linkextractor, linkscan, linkwalker, loader, miner, majestic, mechanize, \
    morfeus, moveoverbot, netmechanic, netspider, nicerspro, nikto, ninja, nutch, octopus, \
    pagegrabber, planetwork, postrank, proximic, purebot, pycurl, python, queryn, \
    queryseeker, radian6, radiation, realdownload, rogerbot, scooter, seekerspider, semalt, \
    siclab, sindice, sistrix, sitebot, siteexplorer, sitesnagger, skygrid, smartdownload, \
    snoopy, sosospider, spankbot, spbot, sqlmap, stackrambler, stripper, sucker, surftbot, \
    sux0r, suzukacz, suzuran, takeout, teleport, telesoft, true_robots, turingos, turnit, \
    vampire, vikspider, voideye, webleacher, webreaper, webstripper, webviewer, webwhacker, \
    winhttp, wwwoffle, woxbot, xaldon, xxxyy, yamanalab, yioopbot, youda, zeus, zmeu, zune, \
    zyborg";

/// URL substrings blocked by default
pub const DEFAULT_URL_CONTENTS: &str = "AND%201=, information_schema, UNION%20SELECT, UNION%20ALL%20SELECT, eval(, wp-config, \
    %%30%30, GLOBALS[, .ini, REQUEST[, etc/passwd, base64_, javascript:, ../, 127.0.0.1, \
    input_filetemp00, 70bex, admin_events, configbak, dompdf, filenetworks, jahat, kcrew, \
    keywordspy, mobiquo, nessus, racrew, makefile, pingserver, crossdomain, locus7, bitrix, \
    msoffice, mailto, mailman, child_terminate, concat, allow_url_fopen, allow_url_include, \
    auto_prepend_file, blexbot, browsersploit, c99, curltest, disable_function, \
    document_root, elastix, encodeuricom, exec, exploit, fclose, fgets, fputs, fread, \
    fsbuff, fsockopen, gethostbyname, grablogin, hmei7, load_file, open_basedir, outfile, \
    passthru, popen, proc_open, quickbrute, remoteview, safe_mode, shell_exec, sux0r, \
    trojan, xertive, <script, fopen, benchmark, .php.inc, mosconfig, get_permalink, \
    the_permalink, cmd, command, mkdir, rmdir, chdir, ckfinder, fullclick, fckeditor, \
    timthumb, absolute_dir, absolute_path, root_dir, root_path, basedir, basepath, \
    loopback, %00, 0x00, %0d%0a, ";

/// Remote host substrings blocked by default
pub const DEFAULT_HOST_CONTENTS: &str = "163data, amazonaws, colocrossing, crimea, g00g1e, justhost, kanagawa, loopia, \
    masterhost, onlinehome, poneytel, sprintdatacenter, reverse.softlayer, safenet, ttnet, \
    woodpecker, wowrack";

/// Referer substrings blocked by default
pub const DEFAULT_REFERER_CONTENTS: &str = "semalt.com, todaperfeita, ambien, blue spill, cialis, cocaine, ejaculat, erectile, \
    erections, hoodia, huronriveracres, impotence, levitra, libido, lipitor, phentermin, \
    pro[sz]ac, sandyauer, tramadol, troyhamby, ultram, unicauca, valium, viagra, vicodin, \
    xanax, ypxaieo";

/// A deny-list category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyCategory {
    UserAgents,
    UrlContents,
    HostContents,
    RefererContents,
}

impl DenyCategory {
    pub const ALL: [DenyCategory; 4] = [
        DenyCategory::UserAgents,
        DenyCategory::UrlContents,
        DenyCategory::HostContents,
        DenyCategory::RefererContents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DenyCategory::UserAgents => "user_agents",
            DenyCategory::UrlContents => "url_contents",
            DenyCategory::HostContents => "host_contents",
            DenyCategory::RefererContents => "referer_contents",
        }
    }

    pub fn default_list(&self) -> &'static str {
        match self {
            DenyCategory::UserAgents => DEFAULT_USER_AGENTS,
            DenyCategory::UrlContents => DEFAULT_URL_CONTENTS,
            DenyCategory::HostContents => DEFAULT_HOST_CONTENTS,
            DenyCategory::RefererContents => DEFAULT_REFERER_CONTENTS,
        }
    }
}

/// Changes applied to a default list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOverride {
    /// Full replacement of the default list; an empty string disables the category
    pub replace: Option<String>,
    /// Extra entries added after the (possibly replaced) list
    pub append: Vec<String>,
}

/// The four deny lists as comma-separated strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenyLists {
    pub user_agents: String,
    pub url_contents: String,
    pub host_contents: String,
    pub referer_contents: String,
}

impl Default for DenyLists {
    fn default() -> Self {
        Self {
            user_agents: DEFAULT_USER_AGENTS.to_string(),
            url_contents: DEFAULT_URL_CONTENTS.to_string(),
            host_contents: DEFAULT_HOST_CONTENTS.to_string(),
            referer_contents: DEFAULT_REFERER_CONTENTS.to_string(),
        }
    }
}

impl DenyLists {
    /// Lists with every category empty
    pub fn empty() -> Self {
        Self {
            user_agents: String::new(),
            url_contents: String::new(),
            host_contents: String::new(),
            referer_contents: String::new(),
        }
    }

    pub fn get(&self, category: DenyCategory) -> &str {
        match category {
            DenyCategory::UserAgents => &self.user_agents,
            DenyCategory::UrlContents => &self.url_contents,
            DenyCategory::HostContents => &self.host_contents,
            DenyCategory::RefererContents => &self.referer_contents,
        }
    }

    fn get_mut(&mut self, category: DenyCategory) -> &mut String {
        match category {
            DenyCategory::UserAgents => &mut self.user_agents,
            DenyCategory::UrlContents => &mut self.url_contents,
            DenyCategory::HostContents => &mut self.host_contents,
            DenyCategory::RefererContents => &mut self.referer_contents,
        }
    }

    pub fn replace(&mut self, category: DenyCategory, list: impl Into<String>) {
        *self.get_mut(category) = list.into();
    }

    /// Add entries to the end of a list
    pub fn append<S: AsRef<str>>(&mut self, category: DenyCategory, entries: &[S]) {
        let list = self.get_mut(category);
        for entry in entries {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                continue;
            }
            let trimmed = list.trim_end().trim_end_matches(',').trim_end();
            *list = if trimmed.is_empty() {
                entry.to_string()
            } else {
                format!("{}, {}", trimmed, entry)
            };
        }
    }

    pub fn apply(&mut self, category: DenyCategory, change: &ListOverride) {
        if let Some(list) = &change.replace {
            self.replace(category, list.clone());
        }
        self.append(category, change.append.as_slice());
    }

    /// Entries of a list, trimmed, without empty ones
    pub fn entries(&self, category: DenyCategory) -> Vec<&str> {
        split_entries(self.get(category)).collect()
    }
}

/// Split a comma-separated list, dropping surrounding whitespace and empty entries
pub fn split_entries(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|e| !e.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_plain_data() {
        let lists = DenyLists::default();
        let url = lists.entries(DenyCategory::UrlContents);
        assert!(url.contains(&"UNION%20SELECT"));
        assert!(url.contains(&"input_filetemp00"));
        assert!(url.contains(&"%%30%30"));
        assert_eq!(url.last(), Some(&"%0d%0a"));

        let hosts = lists.entries(DenyCategory::HostContents);
        assert_eq!(hosts.len(), 17);
        assert_eq!(hosts[0], "163data");

        let referers = lists.entries(DenyCategory::RefererContents);
        assert!(referers.contains(&"pro[sz]ac"));
        assert!(lists.entries(DenyCategory::UserAgents).contains(&"sqlmap"));
    }

    #[test]
    fn test_append_and_replace() {
        let mut lists = DenyLists::empty();
        lists.append(DenyCategory::HostContents, &["evil.example", " ", "bad.test"]);
        assert_eq!(lists.host_contents, "evil.example, bad.test");

        lists.apply(
            DenyCategory::HostContents,
            &ListOverride {
                replace: Some("only.this".into()),
                append: vec!["and.that".into()],
            },
        );
        assert_eq!(lists.entries(DenyCategory::HostContents), vec!["only.this", "and.that"]);
    }

    #[test]
    fn test_append_after_trailing_comma() {
        let mut lists = DenyLists::default();
        lists.append(DenyCategory::UrlContents, &["extra-entry"]);
        assert!(lists.url_contents.ends_with("%0d%0a, extra-entry"));
    }
}
